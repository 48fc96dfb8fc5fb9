//! Prompt rendering for generation-backed classifiers.

use super::ClassificationRequest;
use super::retrieval::CategoryDocument;
use std::fmt::Write;

/// Render the classification instruction for one request.
pub fn build_prompt(request: &ClassificationRequest) -> String {
    format!(
        "<context>\n\
         \x20   You are a classifier that assigns product descriptions to a category in the taxonomy format A:B:C:D based on the product's current classification, short description, and long description.\n\
         </context>\n\
         <instruction>\n\
         \x20   Respond with exactly one of the category codes.\n\
         \x20   If no exact match is found, choose the closest matching category.\n\
         \x20   Do not add any extra text or explanation.\n\
         </instruction>\n\
         <example>\n\
         \x20   This product was classified in the past taxonomy as {} = {}.\n\
         </example>\n\
         <task>\n\
         \x20   <short-description>{}</short-description>\n\
         \x20   <long-description>{}</long-description>\n\
         </task>\n",
        request.current_classification,
        request.current_classification_desc.as_deref().unwrap_or(""),
        request.short_description,
        request.long_description.as_deref().unwrap_or(""),
    )
}

/// Append retrieved reference categories to a prompt.
///
/// An empty document list leaves the prompt unchanged.
pub fn augment_with_context(prompt: &str, documents: &[CategoryDocument]) -> String {
    if documents.is_empty() {
        return prompt.to_string();
    }

    let mut augmented = String::with_capacity(prompt.len() + documents.len() * 64);
    augmented.push_str(prompt);
    augmented.push_str("\nCandidate categories:\n---------------------\n");
    for document in documents {
        // writing into a String cannot fail
        let _ = writeln!(augmented, "{} = {}", document.code, document.description);
    }
    augmented.push_str("---------------------\n");
    augmented
}
