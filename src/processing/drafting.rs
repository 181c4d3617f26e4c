//! Default wording for new resume lines

use crate::processing::composer::Addition;
use crate::processing::document::SectionKind;
use crate::processing::gap_analyzer::MissingRequirement;

/// Propose a line that works `keyword` into a section of the given kind
pub fn draft_content(keyword: &str, target: SectionKind, context: Option<&str>) -> String {
    let keyword = keyword.trim();
    let context = context.map(str::trim).filter(|c| !c.is_empty());

    match (target, context) {
        (SectionKind::Skills, _) => keyword.to_string(),
        (SectionKind::Experience, Some(context)) => format!(
            "Developed {} solutions for {}, improving efficiency and delivering measurable results",
            keyword, context
        ),
        (SectionKind::Experience, None) => format!(
            "Developed and maintained {}-based applications with a focus on performance and reliability",
            keyword
        ),
        (SectionKind::Projects, Some(context)) => format!(
            "Utilized {} to build {}, applying it end to end in a working project",
            keyword, context
        ),
        (SectionKind::Projects, None) => format!("Applied {} in a personal project to explore advanced features", keyword),
        (SectionKind::Summary, _) => format!("Proficient in {}", keyword),
        (_, Some(context)) => format!("Applied {} expertise in {}", keyword, context),
        (_, None) => format!("Experienced with {}", keyword),
    }
}

impl Addition {
    /// Build an addition for a missing requirement with drafted content
    pub fn drafted(missing: &MissingRequirement, target: &str, context: Option<&str>) -> Self {
        let kind = SectionKind::from_name(target);
        let keyword = &missing.keyword;

        Addition::new(
            keyword.term.clone(),
            target,
            draft_content(&keyword.term, kind, context),
            keyword.category.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::requirements::{Importance, RequirementCategory, RequirementKeyword};

    #[test]
    fn test_draft_by_section() {
        assert_eq!(draft_content("AWS", SectionKind::Skills, Some("ignored")), "AWS");
        assert_eq!(draft_content("Rust", SectionKind::Summary, None), "Proficient in Rust");
        assert_eq!(draft_content("Kafka", SectionKind::Other, None), "Experienced with Kafka");
        assert!(draft_content("Docker", SectionKind::Experience, Some("the billing team"))
            .starts_with("Developed Docker solutions for the billing team"));
        assert!(draft_content("Docker", SectionKind::Experience, Some("  ")).starts_with("Developed and maintained"));
    }

    #[test]
    fn test_drafted_addition() {
        let missing = MissingRequirement {
            keyword: RequirementKeyword {
                term: "GraphQL".to_string(),
                category: RequirementCategory::TechnicalSkill,
                importance: Importance::Required,
                offset: 0,
            },
            suggested_sections: vec![SectionKind::Skills],
        };

        let addition = Addition::drafted(&missing, "Projects", Some("a recipe API"));
        assert_eq!(addition.keyword, "GraphQL");
        assert_eq!(addition.target_section, "Projects");
        assert_eq!(addition.category, "technical_skill");
        assert!(addition.content.starts_with("Utilized GraphQL to build a recipe API"));
    }
}
