//! Retrieval instruction sent to the search-grounded model.
//!
//! The layout lines are written with the primary name of each label in the
//! [`LabelMap`], so whatever the parser is configured to read is what the
//! model is asked to write.

use crate::models::Category;
use crate::parser::LabelMap;
use itertools::Itertools;

/// Build the instruction text.
///
/// `focus` is appended as an extra search focus only when the caller opts in
/// to query interpolation; by default the instruction is the fixed template.
pub fn build_instruction(labels: &LabelMap, story_count: usize, focus: Option<&str>) -> String {
    let vocabulary = Category::PREFERRED.iter().map(Category::label).join(", ");

    let mut out = String::from(
        "Perform a deep search for the most recent and critical real estate, economy, \
         and infrastructure news in India published within the last 7 days.\n",
    );
    if let Some(focus) = focus.map(str::trim).filter(|f| !f.is_empty()) {
        out.push_str(&format!("Focus the search on: {focus}.\n"));
    }
    out.push_str(&format!(
        "Find exactly {story_count} distinct and verifiable stories.\n\
         For each story, provide the data in this EXACT format:\n\n\
         {title}: [Specific Headline]\n\
         {excerpt}: [Professional 2-sentence summary including specific data points if available]\n\
         {category}: [Choose ONE: {vocabulary}]\n\
         {image}: [2-3 specific visual keywords for architectural photography, e.g. 'mumbai high-rise', 'bangalore office park', 'delhi metro construction']\n\
         ---",
        title = labels.title_label(),
        excerpt = labels.excerpt_label(),
        category = labels.category_label(),
        image = labels.image_label(),
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_lists_labels_and_count() {
        let text = build_instruction(&LabelMap::default(), 6, None);
        assert!(text.contains("exactly 6 distinct"));
        assert!(text.contains("\nTITLE: ["));
        assert!(text.contains("\nEXCERPT: ["));
        assert!(text.contains("\nCATEGORY: [Choose ONE: Residential, Commercial, Policy, Economy, Infrastructure]"));
        assert!(text.contains("\nIMAGE_PROMPT: ["));
        assert!(text.ends_with("\n---"));
        assert!(text.contains("India"));
        assert!(!text.contains("Focus the search on"));
    }

    #[test]
    fn test_focus_is_interpolated_when_given() {
        let text = build_instruction(&LabelMap::default(), 5, Some("  Pune metro  "));
        assert!(text.contains("Focus the search on: Pune metro.\n"));
        assert!(text.contains("exactly 5 distinct"));
    }

    #[test]
    fn test_blank_focus_is_ignored() {
        let text = build_instruction(&LabelMap::default(), 6, Some("   "));
        assert!(!text.contains("Focus the search on"));
    }

    #[test]
    fn test_uses_primary_label_names() {
        let labels = LabelMap {
            image: vec!["IMAGE_KEY".to_string(), "IMAGE_PROMPT".to_string()],
            ..LabelMap::default()
        };
        let text = build_instruction(&labels, 6, None);
        assert!(text.contains("\nIMAGE_KEY: ["));
        assert!(!text.contains("IMAGE_PROMPT"));
    }
}
