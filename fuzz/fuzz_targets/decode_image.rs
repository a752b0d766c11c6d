#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut limits = rawtiff::decoder::Limits::default();
    limits.decoding_buffer_size = 1_000_000;
    limits.ifd_value_size = 1_000_000;

    let mut reader = rawtiff::decoder::Reader::new(std::io::Cursor::new(data)).with_limits(limits);
    if reader.open().is_err() {
        return;
    }

    let _ = reader.count_frames();
    loop {
        for sample in 0..reader.samples_per_pixel() {
            let _ = reader.get_sample_data(sample);
        }
        if reader.read_next_frame().is_err() {
            break;
        }
    }
});
