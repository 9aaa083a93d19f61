use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use hyphtree::{ExceptionPart, HyphenationTree, PatternConsumer, Statistics, WORD_BOUNDARY};

use clap::Parser;

const TRIALS: usize = 10;
const REMAIN_CHAR_COUNT: usize = 2;
const PUSH_CHAR_COUNT: usize = 2;

#[derive(Parser, Debug)]
#[clap(name = "measure", about = "A program to measure the performance.")]
struct Args {
    /// TeX patterns such as `hy3ph`, one per line. Lines starting with `%` are skipped.
    #[clap(short = 'p', long)]
    patterns_filename: String,

    /// Words to be hyphenated, one per line.
    #[clap(short = 'w', long)]
    words_filename: Option<String>,

    /// Exceptions such as `ta-ble`, one per line.
    #[clap(short = 'e', long)]
    exceptions_filename: Option<String>,
}

fn main() {
    init_tracing();
    let args = Args::parse();

    println!("patterns_filename: {}", &args.patterns_filename);
    let patterns: Vec<(String, String)> = load_file(&args.patterns_filename)
        .iter()
        .filter_map(|line| parse_pattern(line))
        .collect();
    let exceptions = args.exceptions_filename.map(|exceptions_filename| {
        println!("exceptions_filename: {}", &exceptions_filename);
        load_file(&exceptions_filename)
    });
    let words = args.words_filename.map(|words_filename| {
        println!("words_filename: {}", &words_filename);
        load_file(&words_filename)
    });

    println!("#patterns: {}", patterns.len());

    let start = Instant::now();
    let tree = {
        let mut builder = HyphenationTree::builder();
        let letters: BTreeSet<char> = patterns
            .iter()
            .flat_map(|(pattern, _)| pattern.chars())
            .filter(|&c| c != WORD_BOUNDARY)
            .collect();
        for c in letters {
            let group: String = std::iter::once(c).chain(c.to_uppercase()).collect();
            builder.add_class(&group).unwrap();
        }
        for (pattern, digits) in &patterns {
            builder.add_pattern(pattern, digits).unwrap();
        }
        if let Some(exceptions) = exceptions.as_ref() {
            for line in exceptions {
                let (word, parts) = parse_exception(line);
                builder.add_exception(&word, parts).unwrap();
            }
        }
        builder.build().unwrap()
    };
    let duration = start.elapsed();
    print_heap_bytes(tree.heap_bytes());
    println!("num_nodes: {}", tree.num_nodes());
    println!("num_vacants: {}", tree.num_vacants());
    println!("vacant_ratio: {:.3}", tree.vacant_ratio());
    println!("construction: {:.3} [sec]", duration.as_secs_f64());

    if let Some(words) = words.as_ref() {
        let mut dummy = 0;
        let mut num_hyphenated = 0;
        for word in words {
            if tree
                .hyphenate(word, REMAIN_CHAR_COUNT, PUSH_CHAR_COUNT)
                .is_some()
            {
                num_hyphenated += 1;
            }
        }
        let elapsed_sec = measure(TRIALS, || {
            for word in words {
                if let Some(h) = tree.hyphenate(word, REMAIN_CHAR_COUNT, PUSH_CHAR_COUNT) {
                    dummy += h.len();
                }
            }
        });
        println!("#hyphenated: {} / {}", num_hyphenated, words.len());
        println!(
            "hyphenate: {:.3} [ns/word]",
            to_ns(elapsed_sec) / words.len() as f64
        );
        println!("dummy: {}", dummy);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .try_init()
        .ok();
}

/// Splits `hy3ph` into `("hyph", "00300")`.
fn parse_pattern(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('%') {
        return None;
    }
    let mut pattern = String::new();
    let mut digits = String::new();
    let mut last_is_digit = false;
    for c in line.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            last_is_digit = true;
        } else {
            if !last_is_digit {
                digits.push('0');
            }
            pattern.push(c);
            last_is_digit = false;
        }
    }
    if !last_is_digit {
        digits.push('0');
    }
    Some((pattern, digits))
}

/// Splits `ta-ble` into the word `table` and its parts.
fn parse_exception(line: &str) -> (String, Vec<ExceptionPart>) {
    let word: String = line.trim().chars().filter(|&c| c != '-').collect();
    let mut parts = vec![];
    for (i, piece) in line.trim().split('-').enumerate() {
        if i != 0 {
            parts.push(ExceptionPart::hyphen());
        }
        if !piece.is_empty() {
            parts.push(ExceptionPart::text(piece));
        }
    }
    (word, parts)
}

fn print_heap_bytes(bytes: usize) {
    println!(
        "heap_bytes: {} bytes, {:.3} MiB",
        bytes,
        bytes as f64 / (1024.0 * 1024.0)
    );
}

fn load_file<P>(path: P) -> Vec<String>
where
    P: AsRef<Path>,
{
    let file = File::open(path).unwrap();
    let buf = BufReader::new(file);
    buf.lines().map(|line| line.unwrap()).collect()
}

fn measure<F>(num_trials: usize, mut func: F) -> f64
where
    F: FnMut(),
{
    // Warmup
    func();
    // Measure
    let start = Instant::now();
    for _ in 0..num_trials {
        func();
    }
    let duration = start.elapsed();
    duration.as_secs_f64() / num_trials as f64
}

fn to_ns(sec: f64) -> f64 {
    sec * 1_000_000_000.
}
