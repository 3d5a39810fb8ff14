use std::{
    cmp,
    hint::black_box,
    time::{Duration, Instant},
};

use chacha20block::{double_round, keystream_block, Counter, Key, Nonce, State};
use rand_core::{RngCore, SeedableRng};

fn main() {
    println!("label,min,p10,p50,p90,max,min_repeats,max_repeats");
    for bench in collect_benchmarks() {
        let label = bench.label.clone();
        let NanosPerOp {
            min,
            p10,
            p50,
            p90,
            max,
            min_repeats,
            max_repeats,
        } = run_benchmark(bench);
        println!(
            "{label},{min:.2},{p10:.2},{p50:.2},{p90:.2},{max:.2},{min_repeats},{max_repeats}"
        );
        assert!(min <= p10 && p10 <= p50 && p50 <= p90 && p90 <= max);
        assert!(min_repeats <= max_repeats);
    }
}

fn collect_benchmarks() -> Vec<Benchmark> {
    vec![
        bench_double_round(),
        bench_transform(),
        bench_keystream_block(),
        bench_block_rand_chacha(),
    ]
}

#[test]
fn test_benchmarks() {
    for mut bench in collect_benchmarks() {
        (bench.work)(1);
    }
}

const SAMPLES: usize = 100;
const MIN_DURATION: Duration = Duration::from_millis(3);
const MIN_REPEATS: u32 = 1_000;

struct Benchmark {
    label: String,
    work: Box<dyn FnMut(u32)>,
}

struct NanosPerOp {
    min: f64,
    p10: f64,
    p50: f64,
    p90: f64,
    max: f64,
    min_repeats: u32,
    max_repeats: u32,
}

fn run_benchmark(mut bench: Benchmark) -> NanosPerOp {
    let mut times = Vec::with_capacity(SAMPLES);
    let mut min_repeats = u32::MAX;
    let mut max_repeats = 0;
    for _ in 0..SAMPLES {
        let (dt, repeats) = one_sample(&mut bench);
        min_repeats = cmp::min(min_repeats, repeats);
        max_repeats = cmp::max(max_repeats, repeats);
        times.push((dt.as_nanos() as f64) / (repeats as f64));
    }
    times.sort_by(f64::total_cmp);
    let n = times.len();
    NanosPerOp {
        min: times[0],
        p10: times[n / 10],
        p50: times[n / 2],
        p90: times[(n * 9) / 10],
        max: times[n - 1],
        min_repeats,
        max_repeats,
    }
}

fn one_sample(bench: &mut Benchmark) -> (Duration, u32) {
    let mut repeats = MIN_REPEATS;
    loop {
        let t0 = Instant::now();
        (bench.work)(repeats);
        let dt = t0.elapsed();
        if dt >= MIN_DURATION {
            return (dt, repeats);
        }
        let Some(more) = repeats.checked_mul(2) else {
            eprintln!(
                "warning: benchmark {} did not reach min. duration after {} repeats",
                bench.label, repeats
            );
            return (dt, repeats);
        };
        repeats = more;
    }
}

const KEY: &[u8; 32] = b"thisisjustabenchthisisjustabench";
const NONCE: &[u8; 8] = b"benchnon";

fn bench_double_round() -> Benchmark {
    let mut x = *State::new(&Key::from(KEY), Counter::Narrow(0), &Nonce::from(NONCE)).words();
    Benchmark {
        label: "double_round".to_string(),
        work: Box::new(move |n| {
            for _ in 0..n {
                double_round(black_box(&mut x));
            }
        }),
    }
}

fn bench_transform() -> Benchmark {
    let state = State::new(&Key::from(KEY), Counter::Narrow(0), &Nonce::from(NONCE));
    Benchmark {
        label: "transform".to_string(),
        work: Box::new(move |n| {
            for _ in 0..n {
                black_box(black_box(&state).transform());
            }
        }),
    }
}

// Includes building the state and serializing the output, with a fresh counter per block the way
// a caller producing several blocks would.
fn bench_keystream_block() -> Benchmark {
    let key = Key::from(KEY);
    let nonce = Nonce::from(NONCE);
    let mut ctr = Counter::Wide([0, 0]);
    Benchmark {
        label: "keystream_block".to_string(),
        work: Box::new(move |n| {
            for _ in 0..n {
                black_box(keystream_block(&key, ctr, &nonce));
                // Restarting after 2^64 blocks reuses counters; irrelevant for timing.
                ctr = ctr.next().unwrap_or(Counter::Narrow(0));
            }
        }),
    }
}

fn bench_block_rand_chacha() -> Benchmark {
    let mut rng = rand_chacha::ChaCha20Rng::from_seed(*KEY);
    let mut dest = [0; 64];
    Benchmark {
        label: "keystream_block/rand_chacha".to_string(),
        work: Box::new(move |n| {
            for _ in 0..n {
                rng.fill_bytes(&mut dest);
                black_box(&mut dest);
            }
        }),
    }
}
