//! LaTeX math rules
//!
//! `$$...$$` and `\begin{name}...\end{name}` are lexed as blocks ahead of
//! every other block rule, and `$...$` ahead of every other inline rule. The
//! enclosed text is kept literally so it survives a round trip untouched.
//! Math never interrupts a paragraph.

use super::block::{BlockGrammar, BlockLexer, BlockMatch, BlockRule, RawBlock};
use super::inline::{InlineGrammar, InlineLexer, InlineRule};
use crate::ir::nodes::{Inline, Math};
use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$\$([^$]*?)\$\$").unwrap());
static BEGIN_ENV: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\\begin\{([a-z]*\*?)\}").unwrap());
static INLINE_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$(.+?)\$").unwrap());

impl BlockGrammar {
    /// Enable `$$` display math and LaTeX environments.
    pub fn with_math(mut self) -> Self {
        self.insert(0, Box::new(BlockLatex));
        self.insert(0, Box::new(BlockMath));
        self
    }
}

impl InlineGrammar {
    /// Enable `$` inline math.
    pub fn with_math(mut self) -> Self {
        self.insert(0, Box::new(InlineMath));
        self
    }
}

struct BlockMath;

impl BlockRule for BlockMath {
    fn name(&self) -> &'static str {
        "block_math"
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        let caps = BLOCK_MATH.captures(src)?;
        let text = caps.get(1)?.as_str().to_string();
        Some(BlockMatch::new(
            caps.get(0)?.end(),
            RawBlock::Math(Math::Display { text }),
        ))
    }
}

struct BlockLatex;

impl BlockRule for BlockLatex {
    fn name(&self) -> &'static str {
        "block_latex"
    }

    fn parse(&self, src: &str, _lexer: &mut BlockLexer<'_>) -> Option<BlockMatch> {
        let caps = BEGIN_ENV.captures(src)?;
        let name = caps.get(1)?.as_str();
        let body_start = caps.get(0)?.end();
        let end_marker = format!("\\end{{{name}}}");
        let body_len = src[body_start..].find(&end_marker)?;
        Some(BlockMatch::new(
            body_start + body_len + end_marker.len(),
            RawBlock::Math(Math::Environment {
                name: name.to_string(),
                body: src[body_start..body_start + body_len].to_string(),
            }),
        ))
    }
}

struct InlineMath;

impl InlineRule for InlineMath {
    fn name(&self) -> &'static str {
        "math"
    }

    fn parse(&self, src: &str, _lexer: &mut InlineLexer<'_>) -> Option<(usize, Inline)> {
        let caps = INLINE_MATH.captures(src)?;
        let text = caps.get(1)?.as_str().to_string();
        Some((caps.get(0)?.end(), Inline::Math(Math::Inline { text })))
    }
}
