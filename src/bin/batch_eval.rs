/*
MIT License

Copyright (c) 2024 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Internal helper binary: runs detection and scoring over a directory of
//! ECG recordings and prints a summary table.
//!
//! Usage: `batch-eval <data-dir> [stem...]`
//!
//! Every `<stem>.csv` needs a `<stem>_annotations.txt` next to it. With
//! no stems given, the directory is scanned for such pairs.

use qrs_detector::{evaluate_records, DetectorConfig, MatchConfig, QrsDetector};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()
        .unwrap();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let Some((data_dir, stems)) = args.split_first() else {
        eprintln!("Usage: batch-eval <data-dir> [stem...]");
        return ExitCode::FAILURE;
    };
    let data_dir = Path::new(data_dir);

    let stems = if stems.is_empty() {
        match discover_stems(data_dir) {
            Ok(stems) => stems,
            Err(err) => {
                eprintln!("Cannot scan '{}': {}", data_dir.display(), err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        stems.to_vec()
    };
    if stems.is_empty() {
        eprintln!(
            "No record/annotation pairs found in '{}'",
            data_dir.display()
        );
        return ExitCode::FAILURE;
    }

    let detector = QrsDetector::new(DetectorConfig::default());
    let report = evaluate_records(data_dir, &stems, &detector, &MatchConfig::default());

    println!("-------------------------------------------------");
    println!("{:<16} {:>7} {:>7} {:>7} {:>7}", "Database", "TP", "FP", "FN", "F1");
    for evaluation in &report.evaluations {
        println!(
            "{:<16} {:>7} {:>7} {:>7} {:>7.3}",
            evaluation.stem,
            evaluation.stats.true_positives,
            evaluation.stats.false_positives,
            evaluation.stats.false_negatives,
            evaluation.stats.f1_score()
        );
    }
    for (stem, err) in &report.failures {
        println!("{stem:<16} FAILED: {err}");
    }
    println!("-------------------------------------------------");
    if let Some(mean_f1) = report.mean_f1() {
        println!("average F1: {mean_f1:.3}");
    }

    if report.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Finds all `<stem>.csv` files that have a `<stem>_annotations.txt`
/// sibling.
fn discover_stems(data_dir: &Path) -> Result<Vec<String>, std::io::Error> {
    let mut stems = Vec::new();
    for entry in std::fs::read_dir(data_dir)? {
        let path = entry?.path();
        let is_csv = path.extension().is_some_and(|extension| extension == "csv");
        if !is_csv {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if data_dir
            .join(format!("{stem}_annotations.txt"))
            .is_file()
        {
            stems.push(stem.to_string());
        }
    }
    stems.sort_unstable();
    Ok(stems)
}
