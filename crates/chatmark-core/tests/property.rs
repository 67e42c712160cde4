use std::panic;

use chatmark_core::{Citation, CitationSource, render, render_sanitized};
use regex::Regex;

const CASES: usize = 200;
const MAX_LEN: usize = 512;
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 \
\n\n\t#@*`$[](){}!<>:+-_=./|~&'\\\\\"";

const GENERATED_TAG: &str = r#"</?(?:h[1-6]|p|br|strong|em|code|pre|table|tr|th|td|ul|ol|li|blockquote|hr|a)(?: [^<>]*)?>"#;

#[test]
fn render_never_panics_on_random_input() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = Lcg::new(0x3c1e_9a77_02d4_b5e1);
    let citations = sample_citations();
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        let result = panic::catch_unwind(|| {
            render(&source, &citations);
            render_sanitized(&source, &citations);
        });
        if result.is_err() {
            return Err(format!("render panicked for case {}: {:?}", case, source).into());
        }
    }
    Ok(())
}

#[test]
fn raw_markup_never_leaks_on_random_input() -> Result<(), Box<dyn std::error::Error>> {
    let tags = Regex::new(GENERATED_TAG)?;
    let entity = Regex::new("&(?:amp|lt|gt|quot);")?;
    let mut rng = Lcg::new(0xb2f0_6d19_44ae_7c03);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        let html = render(&source, &[]);
        let text = tags.replace_all(&html, "");
        let text = entity.replace_all(&text, "");
        if let Some(bad) = text.chars().find(|ch| matches!(ch, '<' | '>' | '&' | '"')) {
            return Err(format!(
                "raw {:?} leaked for case {}\nSource:\n---\n{}\n---\nHTML:\n---\n{}\n---",
                bad, case, source, html
            )
            .into());
        }
    }
    Ok(())
}

#[test]
fn render_is_deterministic() {
    let mut rng = Lcg::new(0x5eed_0000_1234_abcd);
    let citations = sample_citations();
    for _ in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        assert_eq!(render(&source, &citations), render(&source, &citations));
    }
}

fn sample_citations() -> Vec<Citation> {
    vec![
        Citation::new("[1]", vec![CitationSource::new("https://one.example", "One")]),
        Citation::new("a", vec![CitationSource::new("https://a.example", "")]),
    ]
}

fn random_string(rng: &mut Lcg, len: usize) -> String {
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        let idx = rng.gen_range(0, CHARSET.len());
        let byte = CHARSET.get(idx).copied().unwrap_or(b' ');
        out.push(byte as char);
    }
    out
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn gen_range(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        let span = max - min;
        let value = (self.next() >> 1) as usize;
        min + (value % span)
    }
}
