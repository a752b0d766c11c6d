extern crate criterion;
extern crate rawtiff;

use criterion::{
    black_box, measurement::Measurement, BenchmarkGroup, BenchmarkId, Criterion, Throughput,
};
use rawtiff::decoder::Reader;

const WIDTH: u32 = 512;
const HEIGHT: u32 = 512;
const SAMPLES: u16 = 3;
const ROWS_PER_STRIP: u32 = 16;

/// A big endian RGB image with 16-bit samples, so that little endian hosts swap.
fn rgb16(planar: bool) -> Vec<u8> {
    let plane_bytes = (WIDTH * HEIGHT * 2) as usize;
    let total = plane_bytes * usize::from(SAMPLES);
    let strip_len = if planar {
        (WIDTH * ROWS_PER_STRIP * 2) as usize
    } else {
        (WIDTH * ROWS_PER_STRIP * 2) as usize * usize::from(SAMPLES)
    };
    let strips = (total + strip_len - 1) / strip_len;

    // (tag, type, values) with SHORT = 3 and LONG = 4.
    let mut entries: Vec<(u16, u16, Vec<u32>)> = vec![
        (256, 4, vec![WIDTH]),
        (257, 4, vec![HEIGHT]),
        (258, 3, vec![16; SAMPLES.into()]),
        (259, 3, vec![1]),
        (262, 3, vec![2]),
        (273, 4, vec![0; strips]),
        (277, 3, vec![SAMPLES.into()]),
        (278, 4, vec![ROWS_PER_STRIP]),
        (279, 4, vec![0; strips]),
        (284, 3, vec![if planar { 2 } else { 1 }]),
    ];

    let blobs: usize = entries
        .iter()
        .map(|(_, t, v)| v.len() * if *t == 3 { 2 } else { 4 })
        .filter(|&len| len > 4)
        .sum();
    let mut strip_at = (8 + 2 + 12 * entries.len() + 4 + blobs) as u32;
    for (tag, _, values) in entries.iter_mut() {
        for (i, v) in values.iter_mut().enumerate() {
            let len = strip_len.min(total - i * strip_len) as u32;
            match *tag {
                273 => {
                    *v = strip_at;
                    strip_at += len;
                }
                279 => *v = len,
                _ => {}
            }
        }
    }

    let mut data = b"MM".to_vec();
    data.extend_from_slice(&42u16.to_be_bytes());
    data.extend_from_slice(&8u32.to_be_bytes());
    data.extend_from_slice(&(entries.len() as u16).to_be_bytes());

    let mut blob_at = (8 + 2 + 12 * entries.len() + 4) as u32;
    let mut blob_data = Vec::new();
    for (tag, type_, values) in &entries {
        let bytes: Vec<u8> = values
            .iter()
            .flat_map(|&v| {
                if *type_ == 3 {
                    (v as u16).to_be_bytes().to_vec()
                } else {
                    v.to_be_bytes().to_vec()
                }
            })
            .collect();

        data.extend_from_slice(&tag.to_be_bytes());
        data.extend_from_slice(&type_.to_be_bytes());
        data.extend_from_slice(&(values.len() as u32).to_be_bytes());
        if bytes.len() <= 4 {
            let mut slot = [0u8; 4];
            slot[..bytes.len()].copy_from_slice(&bytes);
            data.extend_from_slice(&slot);
        } else {
            data.extend_from_slice(&blob_at.to_be_bytes());
            blob_at += bytes.len() as u32;
            blob_data.extend_from_slice(&bytes);
        }
    }
    data.extend_from_slice(&0u32.to_be_bytes());
    data.extend_from_slice(&blob_data);

    data.extend((0..total).map(|i| (i % 251) as u8));
    data
}

fn read_planes(image: &[u8]) {
    let mut reader = Reader::new(std::io::Cursor::new(black_box(image)));
    reader.open().unwrap();

    for sample in 0..reader.samples_per_pixel() {
        black_box(reader.get_sample_data(sample).unwrap());
    }
}

fn main() {
    struct BenchDef {
        data: Vec<u8>,
        id: &'static str,
        sample_size: usize,
    }

    fn run_bench_def<M: Measurement>(group: &mut BenchmarkGroup<M>, def: BenchDef) {
        group
            .sample_size(def.sample_size)
            .throughput(Throughput::Bytes(def.data.len() as u64))
            .bench_with_input(
                BenchmarkId::new(def.id, def.data.len()),
                def.data.as_slice(),
                |b, input| b.iter(|| read_planes(input)),
            );
    }

    let mut c = Criterion::default().configure_from_args();
    let mut group = c.benchmark_group("tiff-strips");

    run_bench_def(
        &mut group,
        BenchDef {
            data: rgb16(false),
            id: "rgb16-chunky",
            sample_size: 20,
        },
    );

    run_bench_def(
        &mut group,
        BenchDef {
            data: rgb16(true),
            id: "rgb16-planar",
            sample_size: 20,
        },
    );
}
