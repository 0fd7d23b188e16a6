//! Analysis module - the structured summary produced for a courseware document

/// Pedagogical summary of a document
///
/// Always carries exactly three ordered lists. Absent data is an empty
/// list, never a missing field. Item order follows the order in which the
/// items appeared in the model's response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Main topics covered by the document
    pub key_topics: Vec<String>,

    /// Specific learning objectives
    pub learning_objectives: Vec<String>,

    /// Teaching activities that complement the content
    pub suggested_activities: Vec<String>,
}

impl AnalysisResult {
    /// Create an empty result (all three lists empty)
    ///
    /// # Examples
    ///
    /// ```
    /// use edusmart_domain::AnalysisResult;
    ///
    /// let result = AnalysisResult::new();
    /// assert!(result.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a result from the three lists
    pub fn from_parts(
        key_topics: Vec<String>,
        learning_objectives: Vec<String>,
        suggested_activities: Vec<String>,
    ) -> Self {
        Self {
            key_topics,
            learning_objectives,
            suggested_activities,
        }
    }

    /// True when no list holds any item
    pub fn is_empty(&self) -> bool {
        self.key_topics.is_empty()
            && self.learning_objectives.is_empty()
            && self.suggested_activities.is_empty()
    }

    /// Total number of items across the three lists
    pub fn total_items(&self) -> usize {
        self.key_topics.len() + self.learning_objectives.len() + self.suggested_activities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let result = AnalysisResult::new();
        assert!(result.is_empty());
        assert_eq!(result.total_items(), 0);
    }

    #[test]
    fn test_from_parts_preserves_order() {
        let result = AnalysisResult::from_parts(
            vec!["Photosynthesis".to_string(), "Respiration".to_string()],
            vec!["Explain the light reactions".to_string()],
            vec![],
        );

        assert!(!result.is_empty());
        assert_eq!(result.total_items(), 3);
        assert_eq!(result.key_topics[0], "Photosynthesis");
        assert_eq!(result.key_topics[1], "Respiration");
        assert!(result.suggested_activities.is_empty());
    }

    #[test]
    fn test_single_section_is_not_empty() {
        let result = AnalysisResult::from_parts(vec![], vec![], vec!["Lab work".to_string()]);
        assert!(!result.is_empty());
    }
}
