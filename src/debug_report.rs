use datesniff::{ClassifyTrace, FormatInferrer};

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";

pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn wrap(&self, s: impl AsRef<str>, code: &str) -> String {
        if self.enabled { format!("{}{}{}", code, s.as_ref(), RESET) } else { s.as_ref().to_string() }
    }

    fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
        self.wrap(s, color)
    }

    fn bold(&self, s: impl AsRef<str>) -> String {
        self.wrap(s, BOLD)
    }

    fn dim(&self, s: impl AsRef<str>) -> String {
        self.wrap(s, DIM)
    }
}

pub fn print_sample(trace: &ClassifyTrace, recorded: Option<&str>, palette: &Palette) {
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Sample: \"{}\"", trace.input), CYAN)));

    if trace.rejected_early {
        println!("  {}", palette.dim("rejected before compression (length or leading character)"));
    } else {
        println!("  {} {}  {}", palette.dim("shape:"), palette.paint(&trace.shape, BLUE), palette.dim(format!("{:?}", trace.flags)));
        for pass in &trace.passes {
            let outcome = match (&pass.candidate, pass.hit) {
                (Some(candidate), true) => palette.paint(format!("✓ {candidate}"), GREEN),
                (Some(candidate), false) => palette.paint(format!("✗ {candidate} (does not parse)"), YELLOW),
                (None, _) => palette.dim("✗ no candidate"),
            };
            println!("  {} {}  {}", palette.paint(format!("{:<12}", pass.pass.to_string()), BLUE), outcome, palette.dim(format!("{:?}", pass.duration)));
        }
    }

    match recorded {
        Some(pattern) => println!("  {} {}", palette.dim("recorded:"), palette.bold(palette.paint(pattern, GREEN))),
        None => println!("  {} {}", palette.dim("recorded:"), palette.dim("nothing")),
    }
}

pub fn print_summary(inferrer: &FormatInferrer, palette: &Palette) {
    let state = inferrer.state();

    println!("\n{}", palette.paint("━━━ Patterns ━━━", GRAY));
    let mut ranked: Vec<_> = state.results.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    if ranked.is_empty() {
        println!("{}", palette.dim("  No patterns recorded"));
    }
    for (pattern, count) in ranked {
        println!("  {} {}", palette.paint(format!("{count:>5}"), YELLOW), pattern);
    }

    println!("\n{}", palette.paint("━━━ Result ━━━", GRAY));
    match inferrer.result() {
        Some(result) => {
            println!("  {} {}", palette.dim("format:"), palette.bold(palette.paint(result.format_string(), GREEN)));
            println!("  {} {}", palette.dim("type:  "), palette.paint(result.pattern_type().to_string(), BLUE));
            println!("  {} {}", palette.dim("regexp:"), palette.paint(result.regexp(), CYAN));
        }
        None => println!("{}", palette.dim("  No consolidated result")),
    }

    println!("\n{}", palette.paint("━━━ Counters ━━━", GRAY));
    println!(
        "  samples: {}  │  null: {}  │  blank: {}  │  invalid: {}",
        palette.paint(state.sample_count.to_string(), GREEN),
        palette.dim(state.null_count.to_string()),
        palette.dim(state.blank_count.to_string()),
        palette.paint(state.invalid_count.to_string(), YELLOW),
    );
    println!();
}
