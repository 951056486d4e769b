use std::path::{Path, PathBuf};

use dom::to_html;
use sanitize::{SanitizerArgs, SanitizerPipeline};
use sanitize_test_support::{diff_lines, load_fixtures, parse_fragment, snapshot_lines};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn audio_fixtures_match_expected_output() {
    let cases = load_fixtures(&fixture_path("audio.toml"));
    assert!(!cases.is_empty(), "fixture file has no cases");

    let mut failures = Vec::new();
    for case in &cases {
        let args = SanitizerArgs::from_toml_str(&case.args_toml())
            .unwrap_or_else(|err| panic!("{}: invalid args: {err}", case.name));
        let pipeline = SanitizerPipeline::with_default_sanitizers(&args);

        let mut doc = parse_fragment(&case.input);
        let output = pipeline.run(&mut doc).expect("default pipeline is never empty");
        if let Err(err) = doc.check_integrity() {
            failures.push(format!("{}: broken tree after sanitize: {err}", case.name));
            continue;
        }

        let actual = to_html(&doc, doc.root());
        if actual != case.expected {
            let expected_doc = parse_fragment(&case.expected);
            failures.push(format!(
                "{}:\n  expected: {}\n    actual: {}\n{}",
                case.name,
                case.expected,
                actual,
                diff_lines(&snapshot_lines(&expected_doc), &snapshot_lines(&doc))
            ));
        }
        if let Some(modified) = case.modified {
            if modified != output.modified {
                failures.push(format!(
                    "{}: expected modified={modified}, got {}",
                    case.name, output.modified
                ));
            }
        }
    }

    assert!(
        failures.is_empty(),
        "{} of {} fixture(s) failed:\n{}",
        failures.len(),
        cases.len(),
        failures.join("\n")
    );
}

#[test]
fn every_fixture_reports_audio_in_the_conversion_map() {
    for case in load_fixtures(&fixture_path("audio.toml")) {
        let mut doc = parse_fragment(&case.input);
        let output = SanitizerPipeline::with_default_sanitizers(&SanitizerArgs::default())
            .run(&mut doc)
            .unwrap();
        assert!(
            output.selector_conversion_map["audio"].contains("amp-audio"),
            "{}",
            case.name
        );
    }
}
