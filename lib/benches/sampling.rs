use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use patch_extract::{self as pe, Coord, Dims, PositionSampler};

fn uniform_center(c: &mut Criterion) {
    let mut sampler = PositionSampler::with_seed(120);

    c.bench_function("uniform_center", |b| {
        b.iter(|| sampler.uniform_center(black_box(Dims::new(640, 480)), 32))
    });
}

fn proximate_center(c: &mut Criterion) {
    let mut group = c.benchmark_group("proximate_center");

    // Anchors close to the edge reject more of their draws, so measure both
    // the best case and the worst case
    for (name, anchor) in [("middle", Coord::new(320, 240)), ("corner", Coord::new(16, 16))].iter() {
        for stddev in [1.0, 5.0, 25.0].iter() {
            let mut sampler = PositionSampler::with_seed(120);

            group.bench_with_input(
                BenchmarkId::new(*name, stddev),
                stddev,
                |b, &stddev| {
                    b.iter(|| {
                        sampler.proximate_center(*anchor, black_box(Dims::new(640, 480)), 32, stddev)
                    })
                },
            );
        }
    }
    group.finish();
}

fn triplets(c: &mut Criterion) {
    static DIM: u32 = 64;

    let mut group = c.benchmark_group("triplets");
    group.sample_size(20);

    for dim in [DIM, 4 * DIM, 16 * DIM].iter() {
        // Decode once up front so only sampling and cropping are measured
        let img = pe::image::DynamicImage::ImageRgb8(pe::image::RgbImage::new(*dim, *dim));

        let mut gen = pe::TripletGenerator::new(
            pe::CorpusPicker::with_seed(vec![pe::ImageSource::from(img)], 120).unwrap(),
            PositionSampler::with_seed(121),
            32,
            5.0,
        );

        group.bench_with_input(BenchmarkId::from_parameter(dim), dim, |b, _| {
            b.iter(|| black_box(gen.generate().unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, uniform_center, proximate_center, triplets);
criterion_main!(benches);
