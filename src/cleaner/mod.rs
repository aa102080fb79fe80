//! The cleanup engine
//!
//! Walks a parsed stylesheet once, rewriting vendor-prefixed properties
//! and values to their unprefixed form, folding vendor-prefixed
//! `@keyframes` blocks into their unprefixed base, and flagging anything
//! that becomes redundant. Flagged nodes are physically removed in one
//! deferred pass after the walk.

mod keyframes;
mod merge;
mod removal;
mod walker;

use tracing::debug;

use crate::ast::Ast;
use crate::errors::ParseError;
use crate::syntax;

use removal::RunState;

/// Stylesheet cleaner. One instance runs one cleaning at a time; run
/// state is reset at the start of every run, so sequential reuse is safe.
#[derive(Debug, Default)]
pub struct Cleaner {
    ast: Option<Ast>,
    state: RunState,
}

impl Cleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source`, clean the tree, and serialize it back.
    pub fn clean(&mut self, source: &str) -> Result<String, ParseError> {
        let ast = syntax::parse(source)?;
        self.clean_ast(ast);
        Ok(self.to_css())
    }

    /// Clean an already-parsed tree in place. Chainable; the cleaned tree
    /// is retained for [`to_css`](Self::to_css) / [`take_ast`](Self::take_ast).
    pub fn clean_ast(&mut self, ast: Ast) -> &mut Self {
        self.reset();
        let mut ast = ast;
        let root = ast.root();
        debug!(nodes = ast.len(), "cleaning stylesheet");
        self.process_node(&mut ast, root, None);
        self.remove_flagged(&mut ast);
        self.ast = Some(ast);
        self
    }

    /// Serialize the most recently cleaned tree. Empty string when no run
    /// has completed.
    pub fn to_css(&self) -> String {
        self.ast.as_ref().map(syntax::stringify).unwrap_or_default()
    }

    /// Take ownership of the most recently cleaned tree.
    pub fn take_ast(&mut self) -> Option<Ast> {
        self.ast.take()
    }

    /// Drop the retained tree and clear all run-scoped state.
    pub fn reset(&mut self) {
        self.ast = None;
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(source: &str) -> String {
        Cleaner::new().clean(source).unwrap()
    }

    #[test]
    fn test_vendor_declaration_dropped_when_base_exists() {
        assert_eq!(
            clean("a { -webkit-transform: scale(1); transform: scale(1); }"),
            "a {\n  transform: scale(1);\n}"
        );
    }

    #[test]
    fn test_vendor_declaration_dropped_even_when_values_differ() {
        assert_eq!(
            clean("a { -webkit-transform: scale(1); transform: scale(2); }"),
            "a {\n  transform: scale(2);\n}"
        );
    }

    #[test]
    fn test_vendor_declaration_rewritten_when_no_base() {
        assert_eq!(
            clean("a { -moz-transform: scale(1); }"),
            "a {\n  transform: scale(1);\n}"
        );
    }

    #[test]
    fn test_first_rewritten_vendor_wins() {
        // the -webkit- form is rewritten first, so the -moz- form becomes
        // the redundant duplicate
        assert_eq!(
            clean("a { -webkit-transform: scale(1); -moz-transform: scale(2); }"),
            "a {\n  transform: scale(1);\n}"
        );
    }

    #[test]
    fn test_vendor_value_rewritten_in_place() {
        assert_eq!(
            clean("a { transition: -webkit-transform 1s; }"),
            "a {\n  transition: transform 1s;\n}"
        );
    }

    #[test]
    fn test_vendor_value_dropped_when_equivalent_sibling_exists() {
        assert_eq!(
            clean("a { transition: -webkit-transform 1s; transition: transform 1s; }"),
            "a {\n  transition: transform 1s;\n}"
        );
    }

    #[test]
    fn test_gradient_direction_equivalence_across_vendors() {
        assert_eq!(
            clean(
                "a { background: -webkit-linear-gradient(to left, red, blue); \
                 background: linear-gradient(to left, red, blue); }"
            ),
            "a {\n  background: linear-gradient(to left, red, blue);\n}"
        );
    }

    #[test]
    fn test_keyframes_merge_into_base() {
        let out = clean(
            "@-webkit-keyframes spin { 0% { -webkit-transform: rotate(0); opacity: 0.5; } \
             100% { -webkit-transform: rotate(360deg); } } \
             @keyframes spin { 0%, 50% { transform: rotate(0); } }",
        );
        assert_eq!(
            out,
            "@keyframes spin {\n\
             \x20 0%, 50% {\n    transform: rotate(0);\n    opacity: 0.5;\n  }\n\n\
             \x20 100% {\n    transform: rotate(360deg);\n  }\n\
             }"
        );
    }

    #[test]
    fn test_merged_frame_values_are_devendorized() {
        // base block walked first, so the frame is flattened before the
        // vendor declaration arrives; the merge itself must rewrite it
        let source = "@keyframes spin { 0% { opacity: 0; } } \
                      @-webkit-keyframes spin { 0% { transition: -webkit-transform 1s; } }";
        let once = clean(source);
        assert_eq!(
            once,
            "@keyframes spin {\n  0% {\n    opacity: 0;\n    transition: transform 1s;\n  }\n}"
        );
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn test_keyframes_superset_selector_match() {
        // the vendor 0% group folds into the base 0%,50% group; the base's
        // value wins for the conflicting property
        let out = clean(
            "@keyframes spin { 0%, 50% { transform: rotate(45deg); } } \
             @-webkit-keyframes spin { 0% { -webkit-transform: rotate(90deg); } }",
        );
        assert_eq!(
            out,
            "@keyframes spin {\n  0%, 50% {\n    transform: rotate(45deg);\n  }\n}"
        );
    }

    #[test]
    fn test_keyframes_from_to_normalization_for_matching() {
        let out = clean(
            "@-webkit-keyframes fade { from { opacity: 0; } } \
             @keyframes fade { 0% { color: red; } }",
        );
        assert_eq!(
            out,
            "@keyframes fade {\n  0% {\n    color: red;\n    opacity: 0;\n  }\n}"
        );
    }

    #[test]
    fn test_vendor_keyframes_promoted_without_base() {
        assert_eq!(
            clean("@-moz-keyframes fade { from { opacity: 0; } }"),
            "@keyframes fade {\n  from {\n    opacity: 0;\n  }\n}"
        );
    }

    #[test]
    fn test_media_contents_are_cleaned() {
        assert_eq!(
            clean("@media screen { a { -ms-flex: 1; flex: 1; } }"),
            "@media screen {\n  a {\n    flex: 1;\n  }\n}"
        );
    }

    #[test]
    fn test_comments_and_imports_survive() {
        assert_eq!(
            clean("/* note */ @import url(\"a.css\"); a { color: red; }"),
            "/* note */\n\n@import url(\"a.css\");\n\na {\n  color: red;\n}"
        );
    }

    #[test]
    fn test_clean_is_idempotent() {
        let source = "a { -webkit-transform: scale(1); transform: scale(2); } \
                      @-webkit-keyframes spin { 0% { -webkit-transform: rotate(0); } } \
                      @keyframes spin { 0%, 50% { transform: rotate(0); } }";
        let once = clean(source);
        let twice = clean(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_ast_is_chainable_and_recoverable() {
        let ast = crate::syntax::parse("a { -o-transform: none; }").unwrap();
        let mut cleaner = Cleaner::new();
        let css = cleaner.clean_ast(ast).to_css();
        assert_eq!(css, "a {\n  transform: none;\n}");

        let cleaned = cleaner.take_ast().expect("tree retained after run");
        assert_eq!(crate::syntax::stringify(&cleaned), css);
        assert_eq!(cleaner.to_css(), "");
    }

    #[test]
    fn test_sequential_reuse_of_one_cleaner() {
        let mut cleaner = Cleaner::new();
        let first = cleaner.clean("a { -ms-filter: none; }").unwrap();
        let second = cleaner.clean("b { -moz-opacity: 0; }").unwrap();
        assert_eq!(first, "a {\n  filter: none;\n}");
        assert_eq!(second, "b {\n  opacity: 0;\n}");
    }

    #[test]
    fn test_independent_cleaners_do_not_interfere() {
        let mut a = Cleaner::new();
        let mut b = Cleaner::new();
        a.clean_ast(crate::syntax::parse("a { -ms-flex: 1; }").unwrap());
        b.clean_ast(crate::syntax::parse("b { -o-transform: none; }").unwrap());
        assert_eq!(a.to_css(), "a {\n  flex: 1;\n}");
        assert_eq!(b.to_css(), "b {\n  transform: none;\n}");
    }
}
