use criterion::{black_box, criterion_group, criterion_main, Criterion};
use resona::nodes::{LowPassFilter, Sine};
use resona::{create_block, create_sound, GraphNode, Modifier, ProcessContext, SoundGraph, SoundProcessor, StereoSample};

pub fn criterion_benchmark(c: &mut Criterion) {
    let ctx = ProcessContext::new(48_000);

    c.bench_function("LowPassFilter.filter_sample() x64", |b| {
        let mut lpf = LowPassFilter::new(&ctx, 1_000.0, 0.1).unwrap();
        let input = StereoSample::new(0.5, -0.5);

        b.iter(|| {
            for _ in 0..64 {
                black_box(lpf.filter_sample(black_box(input)));
            }
        })
    });

    c.bench_function("LowPassFilter.set_cutoff()", |b| {
        let mut lpf = LowPassFilter::new(&ctx, 1_000.0, 0.1).unwrap();
        let mut cutoff = 100.0;

        b.iter(|| {
            cutoff = if cutoff > 10_000.0 { 100.0 } else { cutoff * 1.01 };
            lpf.set_cutoff(black_box(cutoff)).unwrap();
        })
    });

    c.bench_function("Sound(Sine -> LowPass).next_sample() x64", |b| {
        let mut sound = create_sound(create_block(
            Sine::new(&ctx, 440.0),
            LowPassFilter::new(&ctx, 1_000.0, 0.1).unwrap(),
        ));

        b.iter(|| {
            for _ in 0..64 {
                black_box(sound.next_sample());
            }
        })
    });

    c.bench_function("SoundGraph.process()", |b| {
        let mut graph = SoundGraph::with_capacity(1, 0);
        let mut processor = SoundProcessor::with_capacity(1);
        let node = graph.add_node(GraphNode::sound(create_sound(create_block(
            Sine::new(&ctx, 440.0),
            LowPassFilter::new(&ctx, 1_000.0, 0.1).unwrap(),
        ))));

        b.iter(|| processor.process(&mut graph, node))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
