//=====================================================
// File: print/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Resolve print statement content into output text
// Objective: Stitch literal text together with evaluated {placeholder} spans
//=====================================================

use once_cell::sync::Lazy;
use regex::Regex;

use crate::eval::ExpressionEvaluator;
use crate::interpreter::RuntimeError;

// Non-greedy, so nested braces are not supported.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(.*?)\}").expect("placeholder regex"));

pub struct PrintResolver<'e, 'a> {
    evaluator: &'e mut ExpressionEvaluator<'a>,
}

impl<'e, 'a> PrintResolver<'e, 'a> {
    pub fn new(evaluator: &'e mut ExpressionEvaluator<'a>) -> Self {
        Self { evaluator }
    }

    /// Expand `content` into the text a print statement writes.
    ///
    /// Without placeholders the content is one expression. With placeholders,
    /// text between them is copied verbatim (surrounding double quotes around
    /// the whole content are dropped first) and each placeholder is evaluated.
    /// The first failing placeholder fails the whole resolution.
    pub fn resolve(&mut self, content: &str) -> Result<String, RuntimeError> {
        let content = content.trim();
        if !PLACEHOLDER.is_match(content) {
            return Ok(self.evaluator.evaluate(content)?.render());
        }

        let template = content
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap_or(content);

        let mut output = String::with_capacity(template.len());
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(template) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            output.push_str(&template[last..whole.start()]);
            output.push_str(&self.evaluator.evaluate(inner.as_str())?.render());
            last = whole.end();
        }
        output.push_str(&template[last..]);
        Ok(output)
    }
}


//=====================================================
// End of file
//=====================================================
