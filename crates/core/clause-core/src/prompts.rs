//! Canned prompt templates for common license-analysis requests

use crate::{ClauseError, Result};

/// Built-in templates, in display order
const STANDARD_PROMPTS: &[(&str, &str)] = &[
    (
        "analyze_license",
        "I have a software license agreement that needs comprehensive analysis. Please examine it for key terms, obligations, risks, and provide recommendations for approval or rejection. Include details on licensing model, restrictions, compliance requirements, and any red flags.",
    ),
    (
        "identify_risks",
        "Please identify all compliance risks and red flags in the software license agreement. Focus on potential legal, financial, and operational risks that could impact our organization. Highlight any problematic clauses that need attention.",
    ),
    (
        "extract_terms",
        "Extract and summarize all key legal and business terms from this software license agreement. Include pricing, payment terms, duration, termination conditions, liability clauses, intellectual property rights, and data handling provisions.",
    ),
    (
        "compare_licenses",
        "I need to compare multiple software license agreements. Please analyze the key differences, advantages, and disadvantages of each option. Provide recommendations on which license offers the best terms for our organization.",
    ),
    (
        "compliance_check",
        "Perform a comprehensive compliance assessment of this software license agreement against our internal policies and industry standards. Identify any areas where the license may not meet our requirements.",
    ),
    (
        "liability_review",
        "Review and analyze all liability and indemnification clauses in this software license agreement. Assess the risk exposure and provide recommendations on acceptable vs. problematic liability terms.",
    ),
    (
        "data_protection",
        "Analyze the data protection and privacy requirements in this software license agreement. Review data handling provisions, security requirements, and compliance with regulations like GDPR, CCPA, etc.",
    ),
    (
        "termination_terms",
        "Review all termination and renewal terms in this software license agreement. Analyze exit clauses, notice requirements, data return provisions, and post-termination obligations.",
    ),
    (
        "eula_analysis",
        "This is an End User License Agreement (EULA) that needs analysis. Please examine the user rights, restrictions, installation limitations, and any consumer protection considerations.",
    ),
    (
        "msa_review",
        "This is a Master Service Agreement (MSA) that requires review. Please analyze the framework terms, service levels, governance structure, and relationship management provisions.",
    ),
    (
        "dpa_analysis",
        "This is a Data Processing Agreement (DPA) that needs comprehensive analysis. Review data processing terms, security measures, breach notification, and regulatory compliance provisions.",
    ),
    (
        "opensource_review",
        "This involves open-source software licenses that need compliance review. Analyze license compatibility, attribution requirements, copyleft obligations, and commercial use restrictions.",
    ),
    (
        "approval_recommendation",
        "Based on the software license agreement provided, please give a clear approval or rejection recommendation. Include your reasoning, risk assessment, and any conditions or modifications that would make the license acceptable.",
    ),
    (
        "negotiation_points",
        "Identify the key negotiation points in this software license agreement. Highlight terms that should be modified, clauses that are non-negotiable, and strategic areas where we can improve the terms.",
    ),
    (
        "alternative_solutions",
        "Please suggest alternative licensing solutions or models that might be more favorable than the current software license agreement. Consider different vendors, licensing approaches, or contractual structures.",
    ),
    (
        "cost_analysis",
        "Analyze all cost implications and financial obligations in this software license agreement. Include licensing fees, maintenance costs, potential penalties, and total cost of ownership considerations.",
    ),
];

/// Lookup table from template key to prompt text
#[derive(Debug, Clone, Copy)]
pub struct PromptCatalog {
    entries: &'static [(&'static str, &'static str)],
}

impl PromptCatalog {
    /// The built-in catalog
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_PROMPTS,
        }
    }

    /// Prompt text for `key`
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, text)| *text)
    }

    /// Like [`get`](Self::get), but a missing key is an error naming the choices
    pub fn require(&self, key: &str) -> Result<&'static str> {
        self.get(key).ok_or_else(|| {
            ClauseError::not_found(format!(
                "prompt '{}' (available: {})",
                key,
                self.keys().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Keys in display order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// `(key, text)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
