//! Performance benchmarks for ptsync-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ptsync_engine::{
    series, ExercisePayload, LocalSnapshot, Mutation, MutationIntent, PushResponse,
    SeriesSpecType, SetPayload, Store, WorkoutPayload,
};

fn workout_intent(exercises: usize, sets: i32) -> MutationIntent {
    MutationIntent::LogWorkout(WorkoutPayload {
        plan_id: Some("plan-1".into()),
        day_id: Some("day-1".into()),
        duration_minutes: 60,
        feedback: Some("felt strong".into()),
        timestamp: None,
        exercises: (0..exercises)
            .map(|e| ExercisePayload {
                exercise_id: format!("ex-{}", e),
                sets: (1..=sets)
                    .map(|n| SetPayload {
                        set_number: n,
                        reps: 10,
                        weight: 42.5,
                        rpe: 8,
                    })
                    .collect(),
            })
            .collect(),
    })
}

fn filled_store(size: u64) -> Store {
    let intent = workout_intent(5, 4);
    let mut store = Store::new();
    for i in 0..size {
        store.enqueue(Mutation::new(format!("m_{}", i), &intent, 1000 + i).unwrap());
    }
    store
}

fn bench_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue");

    group.bench_function("enqueue", |b| {
        let intent = workout_intent(5, 4);
        let mut store = Store::new();
        let mut id = 0u64;

        b.iter(|| {
            id += 1;
            let mutation = Mutation::new(format!("m_{}", id), &intent, id).unwrap();
            store.enqueue(black_box(mutation));
        })
    });

    for size in [10u64, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("acknowledge_half", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let store = filled_store(size);
                    let sent: Vec<_> = store.queued_mutations().into_iter().map(|m| m.id).collect();
                    let response = PushResponse {
                        processed_ids: sent.iter().step_by(2).cloned().collect(),
                        failed_ids: sent.iter().skip(1).step_by(2).cloned().collect(),
                    };
                    (store, sent, response)
                },
                |(mut store, sent, response)| {
                    store.acknowledge(black_box(&sent), black_box(&response), 0, Some(5))
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_payloads(c: &mut Criterion) {
    let mut group = c.benchmark_group("payloads");

    let mutation = Mutation::new("m", &workout_intent(8, 5), 1706745600000).unwrap();
    group.bench_function("decode_and_validate", |b| {
        b.iter(|| {
            let MutationIntent::LogWorkout(payload) = black_box(&mutation).decode().unwrap();
            payload.into_draft(mutation.timestamp).unwrap()
        })
    });

    group.bench_function("series_parse_list", |b| {
        b.iter(|| series::parse(black_box("6x(12,10,10,8,8,6)"), SeriesSpecType::Reps))
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for size in [100u64, 1000] {
        let store = filled_store(size);
        let json = store.export_state().to_json().unwrap();

        group.bench_with_input(BenchmarkId::new("export_json", size), &store, |b, store| {
            b.iter(|| store.export_state().to_json().unwrap())
        });

        group.bench_with_input(BenchmarkId::new("import_json", size), &json, |b, json| {
            b.iter(|| Store::import_state(LocalSnapshot::from_json(black_box(json)).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_queue, bench_payloads, bench_snapshot);
criterion_main!(benches);
