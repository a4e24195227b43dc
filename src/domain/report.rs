//! Human-readable rendering of a `Report`

use crate::domain::models::{Report, SummaryPoint, SummarySection};

const RULE: &str = "=======================================";

impl Report {
    /// Renders the seven-section text report
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        push_banner(&mut out, "MEETING ANALYSIS REPORT");

        for section in SummarySection::ALL {
            push_heading(&mut out, section.heading());
            push_points(&mut out, self.summary.section(section), "N/A");
        }

        push_banner(&mut out, "ADDITIONAL INSIGHTS");

        let needs: Vec<String> = self
            .recommendation
            .needs
            .iter()
            .map(|n| n.need.description.clone())
            .collect();
        push_heading(&mut out, "UNMET FINANCIAL NEEDS");
        push_lines(&mut out, &needs, "None identified");

        let mut products = Vec::new();
        for need in &self.recommendation.needs {
            if need.is_gap() {
                products.push(format!(
                    "{}: no product in the catalog clears the similarity threshold",
                    need.need.description
                ));
                continue;
            }
            for m in &need.products {
                products.push(format!(
                    "{} ({}) for \"{}\": {}",
                    m.product.name, m.product.category, need.need.description, m.rationale
                ));
            }
        }
        push_heading(&mut out, "PRODUCT RECOMMENDATIONS");
        push_lines(&mut out, &products, "None");

        push_heading(&mut out, "SUGGESTED NEXT STEPS");
        push_lines(&mut out, &self.recommendation.next_steps, "None");

        out
    }
}

fn push_banner(out: &mut String, title: &str) {
    out.push_str(RULE);
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push_str("\n\n");
}

fn push_heading(out: &mut String, heading: &str) {
    out.push_str(heading);
    out.push_str(":\n");
}

fn push_points(out: &mut String, points: &[SummaryPoint], empty: &str) {
    let lines: Vec<String> = points.iter().map(|p| p.text.clone()).collect();
    push_lines(out, &lines, empty);
}

fn push_lines(out: &mut String, lines: &[String], empty: &str) {
    if lines.is_empty() {
        out.push_str(empty);
        out.push('\n');
    } else {
        for line in lines {
            out.push_str("- ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push('\n');
}
