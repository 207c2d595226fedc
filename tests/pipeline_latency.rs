use cordicmarch::march::engine::{PixelEngine, TickInput};
use cordicmarch::march::pipeline::{PixelOut, PIPELINE_DEPTH};
use cordicmarch::march::ray::RayGenerator;
use cordicmarch::march::sdf::Scene;

fn engine() -> PixelEngine {
    PixelEngine::new(RayGenerator::new(640, 480))
}

/// Coordinates walking across the sphere's silhouette so hits, misses and
/// different luma values are all in the stream.
fn random_inputs(count: usize) -> Vec<TickInput> {
    let mut rng = fastrand::Rng::with_seed(0xC0FFEE);
    (0..count)
        .map(|_| TickInput {
            coord: (rng.u16(180..460), rng.u16(100..380)),
            scene: rng.u8(0..5),
            ..Default::default()
        })
        .collect()
}

#[test]
fn test_output_stream_is_input_stream_delayed_by_depth() {
    let mut engine = engine();
    let inputs = random_inputs(2000);

    // Camera never moves here, so the combinational result can be taken up front.
    let expected: Vec<PixelOut> = inputs
        .iter()
        .map(|input| PixelOut::from_sdf(&engine.evaluate(input)))
        .collect();
    let outputs: Vec<PixelOut> = inputs.iter().map(|&input| engine.tick(input)).collect();

    assert!(outputs[..PIPELINE_DEPTH].iter().all(|&o| o == PixelOut::MISS));
    for t in PIPELINE_DEPTH..outputs.len() {
        assert_eq!(outputs[t], expected[t - PIPELINE_DEPTH], "tick {t}");
    }

    // The stream is not trivially constant.
    assert!(expected.iter().any(|o| o.hit) && expected.iter().any(|o| !o.hit));
    assert!(expected.iter().filter(|o| o.hit).any(|o| o.luma != expected[0].luma));
}

#[test]
fn test_one_output_per_tick_without_skips_or_duplicates() {
    let mut engine = engine();
    // A single hit walked through a stream of misses shows up exactly once.
    let mut outputs = Vec::new();
    for t in 0..20 {
        let coord = if t == 5 { (320, 240) } else { (0, 0) };
        outputs.push(engine.tick(TickInput { coord, scene: Scene::Sphere.bits(), ..Default::default() }));
    }
    let hits: Vec<usize> = outputs.iter().enumerate().filter(|(_, o)| o.hit).map(|(t, _)| t).collect();
    assert_eq!(hits, vec![5 + PIPELINE_DEPTH]);
    assert_eq!(engine.ticks(), 20);
}

#[test]
fn test_reset_mid_stream_drops_in_flight_samples() {
    let mut engine = engine();
    let centre = TickInput { coord: (320, 240), scene: Scene::Sphere.bits(), ..Default::default() };
    for _ in 0..10 {
        engine.tick(centre);
    }
    assert!(engine.pipeline().slots().all(|s| s.hit));

    engine.reset();
    assert!(engine.pipeline().slots().all(|s| s == PixelOut::MISS));
    assert_eq!(engine.pipeline().output(), PixelOut::MISS);

    for _ in 0..PIPELINE_DEPTH {
        assert_eq!(engine.tick(centre), PixelOut::MISS);
    }
    assert!(engine.tick(centre).hit);
}
