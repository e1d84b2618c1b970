use super::PageContext;
use crate::types::*;

pub const SERVER: CheckMeta = CheckMeta::new("Server", Impact::Low, Difficulty::Hard);

/// One substring detector. Matches when any needle occurs in the lower-cased
/// HTML or in the lower-cased script `src` values.
pub struct Detector {
    pub meta: CheckMeta,
    pub label: &'static str,
    pub needles: &'static [&'static str],
    pub explanation: &'static str,
    pub how_to_fix: &'static str,
}

impl Detector {
    pub fn matches(&self, html_lower: &str, scripts_lower: &str) -> bool {
        self.needles
            .iter()
            .any(|needle| html_lower.contains(needle) || scripts_lower.contains(needle))
    }
}

pub const DETECTORS: &[Detector] = &[
    Detector {
        meta: CheckMeta::new("Framework", Impact::Medium, Difficulty::Medium),
        label: "React",
        needles: &["react"],
        explanation: "Modern JS library for building UIs.",
        how_to_fix: "No action needed.",
    },
    Detector {
        meta: CheckMeta::new("Framework", Impact::Medium, Difficulty::Medium),
        label: "Vue.js",
        needles: &["vue"],
        explanation: "Progressive JS framework.",
        how_to_fix: "No action needed.",
    },
    Detector {
        meta: CheckMeta::new("Framework", Impact::Medium, Difficulty::Medium),
        label: "Angular",
        needles: &["angular"],
        explanation: "Platform for building web apps.",
        how_to_fix: "No action needed.",
    },
    Detector {
        meta: CheckMeta::new("Library", Impact::Low, Difficulty::Easy),
        label: "jQuery",
        needles: &["jquery"],
        explanation: "Legacy JS library.",
        how_to_fix: "Consider migrating to modern vanilla JS if possible.",
    },
    Detector {
        meta: CheckMeta::new("UI Framework", Impact::Low, Difficulty::Medium),
        label: "Bootstrap",
        needles: &["bootstrap"],
        explanation: "CSS framework.",
        how_to_fix: "No action needed.",
    },
    Detector {
        meta: CheckMeta::new("CSS Framework", Impact::Low, Difficulty::Medium),
        label: "Tailwind CSS",
        needles: &["tailwindcss"],
        explanation: "Utility-first CSS framework.",
        how_to_fix: "No action needed.",
    },
    Detector {
        meta: CheckMeta::new("Analytics", Impact::Medium, Difficulty::Easy),
        label: "Google Analytics",
        needles: &["google-analytics", "gtag"],
        explanation: "Traffic tracking tool.",
        how_to_fix: "No action needed.",
    },
    Detector {
        meta: CheckMeta::new("Analytics", Impact::Medium, Difficulty::Easy),
        label: "Facebook Pixel",
        needles: &["facebook-pixel", "fbevents"],
        explanation: "Conversion tracking tool.",
        how_to_fix: "No action needed.",
    },
];

pub fn run(ctx: &PageContext<'_>) -> Vec<CheckResult> {
    let mut checks = vec![check_server(ctx)];
    checks.extend(detect_technologies(ctx));
    checks
}

/// Always emitted, so the category is never empty.
pub fn check_server(ctx: &PageContext<'_>) -> CheckResult {
    match ctx.header("server") {
        Some(server) => SERVER
            .result(true, 100, format!("Server: {}", server))
            .explain("The web server software used.")
            .fix("Information only."),
        None => SERVER
            .result(true, 100, "Server header not disclosed")
            .explain("The web server software could not be identified from the response headers.")
            .fix("Information only."),
    }
}

pub fn detect_technologies(ctx: &PageContext<'_>) -> Vec<CheckResult> {
    let html_lower = ctx.html.to_lowercase();
    let scripts_lower = ctx
        .document
        .attr_values("script[src]", "src")
        .join(" ")
        .to_lowercase();

    DETECTORS
        .iter()
        .filter(|d| d.matches(&html_lower, &scripts_lower))
        .map(|d| {
            d.meta
                .result(true, 100, format!("{} detected", d.label))
                .explain(d.explanation)
                .fix(d.how_to_fix)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::fixture::Fixture;

    fn labels(results: &[CheckResult]) -> Vec<&str> {
        results.iter().map(|r| r.description.as_str()).collect()
    }

    #[test]
    fn test_each_detector_matches_its_needles() {
        for detector in DETECTORS {
            for needle in detector.needles {
                assert!(detector.matches(needle, ""), "{} / {}", detector.label, needle);
                assert!(detector.matches("", needle), "{} / {} in scripts", detector.label, needle);
            }
            assert!(!detector.matches("plain page", "/main.js"), "{}", detector.label);
        }
    }

    #[test]
    fn test_detection_is_case_insensitive_and_ordered() {
        let fixture = Fixture::html(
            r#"<script src="/static/JQuery-3.7.min.js"></script>
               <div id="root" data-reactroot></div>
               <script async src="https://www.googletagmanager.com/gtag/js?id=G-1"></script>"#,
        );
        let results = detect_technologies(&fixture.ctx());

        assert_eq!(
            labels(&results),
            vec!["React detected", "jQuery detected", "Google Analytics detected"]
        );
        assert!(results.iter().all(|r| r.passed && r.score == 100));
    }

    #[test]
    fn test_server_check_always_present() {
        let fixture = Fixture::html("").header("Server", "nginx/1.25");
        let results = run(&fixture.ctx());
        assert_eq!(results[0].description, "Server: nginx/1.25");

        let fixture = Fixture::html("<p>nothing to see</p>");
        let results = run(&fixture.ctx());
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
        assert_eq!(results[0].score, 100);
    }
}
