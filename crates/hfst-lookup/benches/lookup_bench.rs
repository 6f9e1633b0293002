// Criterion benchmarks for hfst-lookup.
//
// Uses a generated transducer mapping any lowercase ASCII word `w` to `w+N`:
// the root is an index-table state with one cell per letter looping back to
// itself, plus an epsilon `+N` arc to a final transition-table state.
//
// Run:
//   cargo bench -p hfst-lookup

use criterion::{Criterion, criterion_group, criterion_main};
use hfst_lookup::{LookupState, NO_SYMBOL, NO_TABLE_INDEX, TRANSITION_TARGET_TABLE_START, Transducer};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

const LETTERS: u16 = 26;
const TAG: u16 = LETTERS + 1;

fn build_fixture() -> Vec<u8> {
    const T: u32 = TRANSITION_TARGET_TABLE_START;

    let mut symbols = vec![String::new()];
    symbols.extend((b'a'..=b'z').map(|c| (c as char).to_string()));
    symbols.push("+N".to_string());

    // Root: head, epsilon cell, one cell per letter.
    let mut index = vec![(NO_SYMBOL, NO_TABLE_INDEX), (0u16, T)];
    index.extend((1..=LETTERS).map(|k| (k, T + k as u32)));

    // 0: eps:+N to the final state; 1..=26: letter loops to the root;
    // 27: final state head.
    let final_state = T + LETTERS as u32 + 1;
    let mut transitions = vec![(0u16, TAG, final_state)];
    transitions.extend((1..=LETTERS).map(|k| (k, k, 0u32)));
    transitions.push((NO_SYMBOL, NO_SYMBOL, 1));

    let mut data = Vec::new();
    data.extend_from_slice(&(LETTERS + 1).to_le_bytes());
    data.extend_from_slice(&(symbols.len() as u16).to_le_bytes());
    data.extend_from_slice(&(index.len() as u32).to_le_bytes());
    data.extend_from_slice(&(transitions.len() as u32).to_le_bytes());
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&(transitions.len() as u32).to_le_bytes());
    data.extend_from_slice(&[0u8; 36]);
    for s in &symbols {
        data.extend_from_slice(s.as_bytes());
        data.push(0);
    }
    for (input, target) in index {
        data.extend_from_slice(&input.to_le_bytes());
        data.extend_from_slice(&target.to_le_bytes());
    }
    for (input, output, target) in transitions {
        data.extend_from_slice(&input.to_le_bytes());
        data.extend_from_slice(&output.to_le_bytes());
        data.extend_from_slice(&target.to_le_bytes());
    }
    data
}

fn wordlist() -> Vec<String> {
    (0..200)
        .map(|i: u32| {
            let len = 3 + (i % 12) as usize;
            (0..len)
                .map(|j| (b'a' + ((i * 7 + j as u32 * 13) % 26) as u8) as char)
                .collect()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_load(c: &mut Criterion) {
    let data = build_fixture();
    c.bench_function("load_fixture", |b| {
        b.iter(|| std::hint::black_box(Transducer::from_bytes(&data).unwrap()));
    });
}

/// Analyze 200 words, allocating fresh lookup state per word.
fn bench_analyze_words(c: &mut Criterion) {
    let transducer = Transducer::from_bytes(&build_fixture()).unwrap();
    let words = wordlist();

    c.bench_function("analyze_200_words", |b| {
        b.iter(|| {
            for word in &words {
                std::hint::black_box(transducer.analyze(word));
            }
        });
    });
}

/// Same as above, reusing one lookup state.
fn bench_analyze_with_state(c: &mut Criterion) {
    let transducer = Transducer::from_bytes(&build_fixture()).unwrap();
    let words = wordlist();
    let mut state = LookupState::new();

    c.bench_function("analyze_200_words_reused_state", |b| {
        b.iter(|| {
            for word in &words {
                std::hint::black_box(transducer.analyze_with(&mut state, word));
            }
        });
    });
}

fn bench_tokenize(c: &mut Criterion) {
    let transducer = Transducer::from_bytes(&build_fixture()).unwrap();
    let words = wordlist();

    c.bench_function("tokenize_200_words", |b| {
        b.iter(|| {
            for word in &words {
                std::hint::black_box(transducer.tokenize(word));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_load,
    bench_analyze_words,
    bench_analyze_with_state,
    bench_tokenize
);
criterion_main!(benches);
