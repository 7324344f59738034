use lognote::rich_line::RichLine;
use lognote::search::{SearchState, find_all};
use lognote::sorter::{SortKey, SortOrder, sort_lines};
use lognote::timestamp::parse_leading_timestamp;
use std::time::Instant;

/// Measures execution time of a function in nanoseconds
fn measure_time<F, R>(iterations: usize, mut f: F) -> u128
where
    F: FnMut() -> R,
{
    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(f());
    }
    start.elapsed().as_nanos() / iterations as u128
}

/// Sample log line for testing (typical production log line)
const SAMPLE_LOG_LINE: &str = "2024-10-18 21:20:22.123 INFO [thread-pool-1] com.example.service.UserService - Processing user request id=12345 user=john.doe@example.com status=active duration=42ms";

fn sample_text(lines: usize) -> String {
    let mut text = String::new();
    for i in 0..lines {
        let level = if i % 10 == 0 { "WARN" } else { "INFO" };
        text.push_str(&format!(
            "2024-10-18 21:{:02}:{:02} {level} worker-{} request id={i}\n",
            (i / 60) % 60,
            i % 60,
            i % 8
        ));
    }
    text
}

fn sample_lines(lines: usize) -> Vec<RichLine> {
    // Reverse chronological so the sort has work to do.
    sample_text(lines).lines().rev().map(RichLine::new).collect()
}

#[test]
fn perf_parse_leading_timestamp() {
    let iterations = 10000;
    let avg_time_max = 50_000;

    let avg_time = measure_time(iterations, || parse_leading_timestamp(SAMPLE_LOG_LINE));

    println!("parse_leading_timestamp: {} ns/iteration", avg_time);

    assert!(
        avg_time < avg_time_max,
        "parse_leading_timestamp is too slow: {} ns (max allowed: {} ns)",
        avg_time,
        avg_time_max
    );
}

#[test]
fn perf_sort_by_timestamp() {
    let lines = sample_lines(10_000);

    let iterations = 5;
    let avg_time_max = 2_000_000_000;

    let avg_time = measure_time(iterations, || {
        sort_lines(&lines, SortOrder::Ascending, SortKey::Timestamp)
    });

    println!("sort 10k lines by timestamp: {} ns/iteration", avg_time);

    assert!(
        avg_time < avg_time_max,
        "timestamp sort is too slow: {} ns (max allowed: {} ns)",
        avg_time,
        avg_time_max
    );
}

#[test]
fn perf_sort_by_text() {
    let lines = sample_lines(10_000);

    let iterations = 5;
    let avg_time_max = 500_000_000;

    let avg_time = measure_time(iterations, || {
        sort_lines(&lines, SortOrder::Descending, SortKey::Text)
    });

    println!("sort 10k lines by text: {} ns/iteration", avg_time);

    assert!(
        avg_time < avg_time_max,
        "text sort is too slow: {} ns (max allowed: {} ns)",
        avg_time,
        avg_time_max
    );
}

#[test]
fn perf_find_all_ignore_case() {
    let text = sample_text(50_000);

    let iterations = 5;
    let avg_time_max = 1_000_000_000;

    let avg_time = measure_time(iterations, || find_all(&text, "warn", false));

    println!("find_all over 50k lines: {} ns/iteration", avg_time);

    assert_eq!(find_all(&text, "warn", false).len(), 5_000);
    assert!(
        avg_time < avg_time_max,
        "find_all is too slow: {} ns (max allowed: {} ns)",
        avg_time,
        avg_time_max
    );
}

#[test]
fn perf_find_next_walk() {
    let text = sample_text(20_000);

    let iterations = 3;
    let avg_time_max = 1_000_000_000;

    let avg_time = measure_time(iterations, || {
        let mut search = SearchState::new(true);
        let mut hits = 0;
        while search.next(&text, "WARN").is_some() {
            hits += 1;
        }
        hits
    });

    println!("find_next through 20k lines: {} ns/iteration", avg_time);

    assert!(
        avg_time < avg_time_max,
        "stepping through matches is too slow: {} ns (max allowed: {} ns)",
        avg_time,
        avg_time_max
    );
}
