use boxlink::config::{DiagramConfig, RenderConfig};
use boxlink::diagram::Diagram;
use boxlink::geometry::vector;
use boxlink::model::{Anchor, DiagramBox};
use boxlink::parser::parse_scene;
use boxlink::render::render_svg;
use boxlink::theme::Theme;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// A row of touching boxes joined in sequence, with the first box shoved
/// into the second.
fn row_scene(boxes: usize) -> String {
    let mut out = String::from("# generated row\n");
    for i in 0..boxes {
        out.push_str(&format!("box b{} at {} 0\n", i, i * 120));
    }
    for i in 0..boxes.saturating_sub(1) {
        out.push_str(&format!("connect b{} b{}\n", i, i + 1));
    }
    if boxes > 0 {
        out.push_str("move b0 by 30 0\n");
    }
    out
}

fn bench_hit_delta(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_delta");
    let anchor = DiagramBox::new(120.0, 100.0, vector(0.0, 0.0));
    for (name, position) in [
        ("disjoint", vector(500.0, 500.0)),
        ("horizontal", vector(100.0, 10.0)),
        ("vertical", vector(10.0, 90.0)),
    ] {
        let other = DiagramBox::new(120.0, 100.0, position);
        group.bench_with_input(BenchmarkId::from_parameter(name), &other, |b, other| {
            b.iter(|| black_box(black_box(&anchor).hit_delta(other)));
        });
    }
    group.finish();
}

fn bench_connector_endpoints(c: &mut Criterion) {
    let mut group = c.benchmark_group("connector_endpoints");
    let source = DiagramBox::new(120.0, 100.0, vector(0.0, 0.0));
    let target = DiagramBox::new(120.0, 100.0, vector(310.0, 170.0));
    let cases = [
        ("nearest", Anchor::nearest(), Anchor::nearest()),
        (
            "nearest_fixed",
            source.nearest_fixed_anchor(),
            target.nearest_fixed_anchor(),
        ),
    ];
    for (name, start, end) in cases {
        let connector = source.straight_connector_to(&target, start, end);
        group.bench_function(name, |b| {
            b.iter(|| {
                let start = connector.start_point().expect("start point");
                let end = connector.end_point().expect("end point");
                black_box((start, end));
            });
        });
    }
    group.finish();
}

fn bench_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_cascade");
    for boxes in [4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(boxes), &boxes, |b, &boxes| {
            b.iter(|| {
                let mut diagram = Diagram::new(DiagramConfig {
                    max_cascade_depth: boxes + 1,
                    ..Default::default()
                });
                let row: Vec<DiagramBox> = (0..boxes)
                    .map(|i| diagram.add_box_at(format!("b{i}"), vector(120.0 * i as f64, 0.0)))
                    .collect();
                row[0].move_by(vector(30.0, 0.0));
                black_box(row[boxes - 1].position());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let theme = Theme::classic();
    let render = RenderConfig::default();
    for boxes in [8usize, 32] {
        let input = row_scene(boxes);
        group.bench_with_input(BenchmarkId::from_parameter(boxes), &input, |b, data| {
            b.iter(|| {
                let scene = parse_scene(black_box(data)).expect("parse failed");
                let mut diagram = Diagram::new(DiagramConfig {
                    max_cascade_depth: boxes + 1,
                    ..Default::default()
                });
                scene.apply(&mut diagram).expect("apply failed");
                let svg = render_svg(&diagram, &theme, &render);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_hit_delta, bench_connector_endpoints, bench_cascade, bench_end_to_end
);
criterion_main!(benches);
