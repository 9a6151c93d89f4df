//! The exam grades text file.
//!
//! The file has one section per exam, headed `GRADES - MIDTERM 1`,
//! `GRADES - MIDTERM 2` and `GRADES - FINAL`. After a dashed separator each
//! line names a student (`S01`) and a score. Final scores are out of 200 and
//! are halved onto the midterms' 100-point scale.

use crate::dataset::ExamType;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const SECTIONS: [(ExamType, &str); 3] = [
    (ExamType::Midterm1, "GRADES - MIDTERM 1"),
    (ExamType::Midterm2, "GRADES - MIDTERM 2"),
    (ExamType::Final, "GRADES - FINAL"),
];

/// Scores by student id, then exam.
pub type Grades = BTreeMap<String, BTreeMap<ExamType, f64>>;

fn separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-{3,}").expect("valid regex"))
}

fn grade_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(S\d+)\D*?(\d+(?:\.\d+)?)").expect("valid regex"))
}

/// `S1` → `S01`; ids with two or more digits and other names are unchanged.
#[must_use]
pub fn normalize_student_id(name: &str) -> String {
    let Some(digits) = name.strip_prefix('S').or_else(|| name.strip_prefix('s')) else {
        return name.to_string();
    };
    match digits.parse::<u32>() {
        Ok(n) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => format!("S{n:02}"),
        _ => name.to_string(),
    }
}

/// Body of the section after `heading`, up to the next section heading.
fn section<'a>(text: &'a str, heading: &str) -> Option<&'a str> {
    let start = text.find(heading)? + heading.len();
    let rest = &text[start..];
    let end = SECTIONS
        .iter()
        .filter_map(|(_, h)| rest.find(h))
        .min()
        .unwrap_or(rest.len());
    let body = &rest[..end];
    // Grades follow the dashed separator under the heading.
    let sep = separator().find(body)?;
    Some(&body[sep.end()..])
}

/// Parse every section of the grades file.
#[must_use]
pub fn parse_grades(text: &str) -> Grades {
    let mut grades = Grades::new();
    for (exam, heading) in SECTIONS {
        let Some(body) = section(text, heading) else {
            tracing::warn!(section = heading, "grades section not found");
            continue;
        };
        for caps in body.lines().filter_map(|line| grade_line().captures(line)) {
            let Ok(score) = caps[2].parse::<f64>() else {
                continue;
            };
            let score = if exam == ExamType::Final { score / 2.0 } else { score };
            grades
                .entry(normalize_student_id(&caps[1]))
                .or_default()
                .insert(exam, score);
        }
    }
    grades
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRADES: &str = "\
GRADES - MIDTERM 1
------------------
S01 \u{2013} 78
S02 \u{2013} 82

GRADES - MIDTERM 2
------------------
S01 - 90
S2: 71.5

GRADES - FINAL
(out of 200)
------------------
S01 182
S10 150
";

    #[test]
    fn test_parse_sections() {
        let grades = parse_grades(GRADES);
        assert_eq!(grades["S01"][&ExamType::Midterm1], 78.0);
        assert_eq!(grades["S01"][&ExamType::Midterm2], 90.0);
        assert_eq!(grades["S02"][&ExamType::Midterm1], 82.0);
        assert_eq!(grades["S02"][&ExamType::Midterm2], 71.5);
        assert!(!grades["S02"].contains_key(&ExamType::Final));
    }

    #[test]
    fn test_final_is_halved() {
        let grades = parse_grades(GRADES);
        assert_eq!(grades["S01"][&ExamType::Final], 91.0);
        assert_eq!(grades["S10"][&ExamType::Final], 75.0);
    }

    #[test]
    fn test_missing_sections() {
        assert!(parse_grades("nothing here").is_empty());
        let only_final = parse_grades("GRADES - FINAL\n-----\nS03 100\n");
        assert_eq!(only_final["S03"][&ExamType::Final], 50.0);
    }

    #[test]
    fn test_normalize_student_id() {
        assert_eq!(normalize_student_id("S1"), "S01");
        assert_eq!(normalize_student_id("S09"), "S09");
        assert_eq!(normalize_student_id("S10"), "S10");
        assert_eq!(normalize_student_id("Shared"), "Shared");
        assert_eq!(normalize_student_id("S"), "S");
    }
}
