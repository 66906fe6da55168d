use std::panic;

use mdskin_core::{RenderConfig, StyleCategory, StyleMapping, render, render_sanitized};

const CASES: usize = 200;
const MAX_LEN: usize = 512;
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 \
\n\r\t#@*`$[](){}!<>:+-_=./\\\\\"'~&;";

#[test]
fn render_never_panics_on_random_input() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x7f4a_2d91_13b4_55a1);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        let mapping = random_mapping(&mut rng);
        let config = RenderConfig {
            allow_raw_html: rng.gen_range(0, 2) == 1,
            ..RenderConfig::default()
        };
        let result = panic::catch_unwind(|| render(&source, &mapping, &config));
        if result.is_err() {
            return Err(format!("render panicked for case {}: {:?}", case, source).into());
        }
    }
    Ok(())
}

#[test]
fn no_markers_survive_rendering() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x91d4_2f8e_c1a3_044f);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        let html = render(&source, &StyleMapping::default(), &RenderConfig::default());
        if html.contains("MDSKINVAULT") {
            return Err(format!(
                "unresolved marker for case {}\nSource:\n---\n{}\n---\nHTML:\n{}",
                case, source, html
            )
            .into());
        }
    }
    Ok(())
}

#[test]
fn escaped_output_never_contains_user_tags() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x3c6e_f372_fe94_f82b);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let mut source = random_string(&mut rng, len);
        source.push_str("\n<script>x</script>");
        let html = render(&source, &StyleMapping::default(), &RenderConfig::default());
        if html.contains("<script") {
            return Err(format!("script tag leaked for case {}: {:?}", case, source).into());
        }
    }
    Ok(())
}

#[test]
fn sanitized_render_never_panics() {
    let mut rng = Lcg::new(0x0bad_cafe_dead_beef);
    let config = RenderConfig {
        allow_raw_html: true,
        ..RenderConfig::default()
    };
    for _ in 0..CASES / 4 {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        let html = render_sanitized(&source, &StyleMapping::default(), &config);
        assert!(!html.contains("<script"));
    }
}

fn random_mapping(rng: &mut Lcg) -> StyleMapping {
    let mut mapping = StyleMapping::default();
    for category in StyleCategory::ALL {
        mapping.set(category, rng.gen_range(0, 20));
    }
    mapping
}

fn random_string(rng: &mut Lcg, len: usize) -> String {
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        let idx = rng.gen_range(0, CHARSET.len());
        out.push(CHARSET[idx] as char);
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
