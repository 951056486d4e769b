#![no_main]

use dom::to_html;
use libfuzzer_sys::fuzz_target;
use sanitize::{SanitizerArgs, SanitizerPipeline};
use sanitize_test_support::parse_fragment;

fuzz_target!(|data: &[u8]| {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    let Ok(input) = std::str::from_utf8(rest) else {
        return;
    };
    let args = SanitizerArgs {
        require_https_src: flags & 1 == 0,
        content_max_width: (flags & 2 != 0).then_some(600),
    };
    let pipeline = SanitizerPipeline::with_default_sanitizers(&args);

    let mut doc = parse_fragment(input);
    pipeline.run(&mut doc).expect("default pipeline has sanitizers");
    if let Err(err) = doc.check_integrity() {
        panic!("broken tree after first pass: {err}");
    }

    let once = to_html(&doc, doc.root());
    let second = pipeline.run(&mut doc).expect("default pipeline has sanitizers");
    assert!(!second.modified, "second pass modified {once:?}");
    assert_eq!(to_html(&doc, doc.root()), once);
});
