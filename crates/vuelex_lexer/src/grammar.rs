//! The composed state tables.
//!
//! The JavaScript grammar lives in `vuelex_script`. This module builds the
//! template grammar around it: markup states whose rules take priority, each
//! ending in a rule that delegates to the script scanner, plus thin script
//! states that the scanner's own mode transitions push and pop.

use crate::error::{Error, Result};
use crate::options::LexerOptions;
use crate::rules::{Emit, Rule, StackAction};
use lazy_static::lazy_static;
use std::fmt;
use tracing::debug;
use vuelex_core::TokenKind::{
    self, CommentMultiline, Keyword, NameAttribute, NameFunction, NameTag, NameVariable,
    Operator, Punctuation, StringBacktick, StringDouble, StringInterpol, StringSingle, Text,
    Whitespace,
};
use vuelex_script::ScriptMode;

/// A lexing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    /// Text content; the bottom of every stack.
    Markup,
    /// Inside a start tag, after its name.
    Tag,
    /// Directly after an attribute's `=`.
    AttributeValue,
    /// A script expression: a bound attribute value or a brace block.
    Expression,
    /// The body of a `{{ }}` interpolation.
    Mustache,
    /// A brace block inside an interpolation. Unlike `Expression`, a `"`
    /// here starts a script string rather than closing an attribute.
    Braces,
    /// A backtick literal opened inside an expression.
    TemplateString,
    /// A `${ }` hole of a `TemplateString`.
    TemplateHole,
    ScriptCode,
    ScriptRegex,
    ScriptTemplate,
    ScriptTemplateHole,
}

impl StateId {
    pub const ALL: [StateId; 12] = [
        StateId::Markup,
        StateId::Tag,
        StateId::AttributeValue,
        StateId::Expression,
        StateId::Mustache,
        StateId::Braces,
        StateId::TemplateString,
        StateId::TemplateHole,
        StateId::ScriptCode,
        StateId::ScriptRegex,
        StateId::ScriptTemplate,
        StateId::ScriptTemplateHole,
    ];

    /// The state every run starts in.
    pub const ROOT: StateId = StateId::Markup;

    /// The state pushed when the script scanner enters `mode`.
    pub fn for_script(mode: ScriptMode) -> StateId {
        match mode {
            ScriptMode::Code => StateId::ScriptCode,
            ScriptMode::RegexAllowed => StateId::ScriptRegex,
            ScriptMode::Template => StateId::ScriptTemplate,
            ScriptMode::TemplateHole => StateId::ScriptTemplateHole,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StateId::Markup => "markup",
            StateId::Tag => "tag",
            StateId::AttributeValue => "attribute-value",
            StateId::Expression => "expression",
            StateId::Mustache => "mustache",
            StateId::Braces => "braces",
            StateId::TemplateString => "template-string",
            StateId::TemplateHole => "template-hole",
            StateId::ScriptCode => "script",
            StateId::ScriptRegex => "script-regex",
            StateId::ScriptTemplate => "script-template",
            StateId::ScriptTemplateHole => "script-template-hole",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A script identifier.
const IDENT: &str = r"[\p{Alphabetic}_$][\w$]*";

/// An attribute name with an optional directive sigil, modifiers (`.prevent`),
/// arguments (`v-on:click`) and dynamic arguments (`:[key]`).
const ATTR_NAME: &str = r"[@:#]?(?:[\w.:-]|\[[^\]\s]*\])+";

/// Immutable rule tables, one per state.
#[derive(Debug, Clone)]
pub struct Grammar {
    states: Vec<Vec<Rule>>,
    options: LexerOptions,
}

lazy_static! {
    static ref EXPRESSION_AWARE: Grammar =
        Grammar::build(&LexerOptions::default()).expect("built-in grammar compiles");
    static ref OPAQUE_ATTRIBUTES: Grammar =
        Grammar::build(&LexerOptions::opaque_attributes()).expect("built-in grammar compiles");
}

impl Grammar {
    /// The process-wide grammar for `options`, built on first use.
    pub fn shared(options: &LexerOptions) -> &'static Grammar {
        if options.expression_aware_attributes {
            &EXPRESSION_AWARE
        } else {
            &OPAQUE_ATTRIBUTES
        }
    }

    /// Build the tables for `options`.
    pub fn build(options: &LexerOptions) -> Result<Grammar> {
        use StackAction::*;

        let shorthands = StateBuilder::new(StateId::Expression)
            .groups(
                &format!(r"({IDENT})(\.)({IDENT})"),
                &[NameVariable, Operator, NameVariable],
                Stay,
            )?
            .groups(&format!(r"({IDENT})( in )"), &[NameVariable, Keyword], Stay)?
            .token("`", StringBacktick, Push(StateId::TemplateString))?
            .groups(
                &format!(r"({IDENT})(\()({IDENT})(\))"),
                &[NameFunction, Punctuation, NameVariable, Punctuation],
                Stay,
            )?
            .into_rules();

        let markup = StateBuilder::new(StateId::Markup)
            .groups(r"(<)([\w-]+)", &[Punctuation, NameTag], Push(StateId::Tag))?
            .groups(
                r"(<)(/)([\w-]+)(>)",
                &[Punctuation, Punctuation, NameTag, Punctuation],
                Stay,
            )?
            .token(r"(?s)<!--.*?-->", CommentMultiline, Stay)?
            .groups(r"(\{)(\{)", &[Punctuation, Punctuation], Push(StateId::Mustache))?
            .delegate(ScriptMode::Code);

        let tag = StateBuilder::new(StateId::Tag)
            .token(r"\s+", Whitespace, Stay)?
            .groups(
                &format!(r"({ATTR_NAME})(\s*)(=)(\s*)"),
                &[NameAttribute, Whitespace, Operator, Whitespace],
                Push(StateId::AttributeValue),
            )?
            .token(r"[{}]+", Punctuation, Stay)?
            .token(ATTR_NAME, NameAttribute, Stay)?
            .groups(r"(/?)(\s*)(>)", &[Punctuation, Whitespace, Punctuation], Pop)?;

        let attribute_value = StateBuilder::new(StateId::AttributeValue)
            .token(r"\{", Punctuation, PopPush(StateId::Expression))?;
        let attribute_value = if options.expression_aware_attributes {
            attribute_value.token("\"", Text, PopPush(StateId::Expression))?
        } else {
            attribute_value.token(r#""[^"]*""#, StringDouble, Pop)?
        };
        let attribute_value = attribute_value
            .token(r"'[^']*'", StringSingle, Pop)?
            .default(Pop);

        let expression = StateBuilder::new(StateId::Expression)
            .token(r"\{", Punctuation, Push(StateId::Expression))?
            .token(r"\}", Punctuation, Pop)?
            .token("\"", Text, Pop)?
            .extend(&shorthands)
            .delegate(ScriptMode::Code);

        let mustache = StateBuilder::new(StateId::Mustache)
            .groups(r"(\})(\})", &[Punctuation, Punctuation], Pop)?
            .token(r"\{", Punctuation, Push(StateId::Braces))?
            .extend(&shorthands)
            .delegate(ScriptMode::Code);

        let braces = StateBuilder::new(StateId::Braces)
            .token(r"\{", Punctuation, Push(StateId::Braces))?
            .token(r"\}", Punctuation, Pop)?
            .extend(&shorthands)
            .delegate(ScriptMode::Code);

        let template_string = StateBuilder::new(StateId::TemplateString)
            .token("`", StringBacktick, Pop)?
            .token(r"\$\{", StringInterpol, Push(StateId::TemplateHole))?
            .delegate(ScriptMode::Template);

        let template_hole = StateBuilder::new(StateId::TemplateHole)
            .groups(
                &format!(r"({IDENT})(\.)({IDENT})(\.)({IDENT})"),
                &[NameVariable, Operator, NameVariable, Operator, NameVariable],
                Stay,
            )?
            .delegate(ScriptMode::TemplateHole);

        let script_code = StateBuilder::new(StateId::ScriptCode).delegate(ScriptMode::Code);
        let script_regex = StateBuilder::new(StateId::ScriptRegex)
            .delegate(ScriptMode::RegexAllowed)
            .default(Pop);
        let script_template =
            StateBuilder::new(StateId::ScriptTemplate).delegate(ScriptMode::Template);
        let script_template_hole =
            StateBuilder::new(StateId::ScriptTemplateHole).delegate(ScriptMode::TemplateHole);

        let mut states = vec![Vec::new(); StateId::ALL.len()];
        for builder in [
            markup,
            tag,
            attribute_value,
            expression,
            mustache,
            braces,
            template_string,
            template_hole,
            script_code,
            script_regex,
            script_template,
            script_template_hole,
        ] {
            states[builder.state.index()] = builder.rules;
        }

        let grammar = Grammar {
            states,
            options: *options,
        };
        debug!(
            expression_aware_attributes = options.expression_aware_attributes,
            rules = grammar.rule_count(),
            "built template grammar"
        );
        Ok(grammar)
    }

    /// The rules of `state`, in priority order.
    #[inline]
    pub fn rules(&self, state: StateId) -> &[Rule] {
        &self.states[state.index()]
    }

    /// The options this grammar was built for.
    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// Total number of rules across all states.
    pub fn rule_count(&self) -> usize {
        self.states.iter().map(Vec::len).sum()
    }
}

/// Accumulates the rules of one state, attributing pattern errors to it.
struct StateBuilder {
    state: StateId,
    rules: Vec<Rule>,
}

impl StateBuilder {
    fn new(state: StateId) -> Self {
        Self {
            state,
            rules: Vec::new(),
        }
    }

    fn token(self, pattern: &str, kind: TokenKind, action: StackAction) -> Result<Self> {
        self.pattern(pattern, Emit::Token(kind), action)
    }

    fn groups(
        self,
        pattern: &str,
        kinds: &'static [TokenKind],
        action: StackAction,
    ) -> Result<Self> {
        self.pattern(pattern, Emit::Groups(kinds), action)
    }

    fn pattern(mut self, pattern: &str, emit: Emit, action: StackAction) -> Result<Self> {
        let regex = Rule::compile(pattern).map_err(|source| Error::Pattern {
            state: self.state,
            pattern: pattern.to_string(),
            source,
        })?;
        self.rules.push(Rule::Match {
            pattern: regex,
            emit,
            action,
        });
        Ok(self)
    }

    fn delegate(mut self, mode: ScriptMode) -> Self {
        self.rules.push(Rule::Delegate(mode));
        self
    }

    fn default(mut self, action: StackAction) -> Self {
        self.rules.push(Rule::Default(action));
        self
    }

    fn extend(mut self, rules: &[Rule]) -> Self {
        self.rules.extend_from_slice(rules);
        self
    }

    fn into_rules(self) -> Vec<Rule> {
        self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both() -> [Grammar; 2] {
        [
            Grammar::build(&LexerOptions::default()).unwrap(),
            Grammar::build(&LexerOptions::opaque_attributes()).unwrap(),
        ]
    }

    #[test]
    fn test_every_state_has_rules() {
        for grammar in both() {
            for state in StateId::ALL {
                assert!(!grammar.rules(state).is_empty(), "{state} has no rules");
            }
        }
    }

    #[test]
    fn test_zero_width_rules_only_pop() {
        for grammar in both() {
            for state in StateId::ALL {
                for rule in grammar.rules(state) {
                    if let Rule::Default(action) = rule {
                        assert_eq!(*action, StackAction::Pop, "{state}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_root_never_pops() {
        for grammar in both() {
            assert!(grammar
                .rules(StateId::ROOT)
                .iter()
                .all(|rule| !matches!(rule.action(), Some(StackAction::Pop) | Some(StackAction::PopPush(_)))));
        }
    }

    #[test]
    fn test_markup_rules_precede_script_delegation() {
        let grammar = Grammar::build(&LexerOptions::default()).unwrap();
        let rules = grammar.rules(StateId::Markup);
        assert!(matches!(rules.last(), Some(Rule::Delegate(ScriptMode::Code))));
        assert!(rules[..rules.len() - 1]
            .iter()
            .all(|rule| matches!(rule, Rule::Match { .. })));
    }

    #[test]
    fn test_variants_differ_only_in_attribute_values() {
        let [aware, opaque] = both();
        assert_eq!(aware.rule_count(), opaque.rule_count());
        let quote = |g: &Grammar| match &g.rules(StateId::AttributeValue)[1] {
            Rule::Match { emit, action, .. } => (*emit, *action),
            other => panic!("unexpected rule {other:?}"),
        };
        assert_eq!(
            quote(&aware),
            (Emit::Token(Text), StackAction::PopPush(StateId::Expression))
        );
        assert_eq!(quote(&opaque), (Emit::Token(StringDouble), StackAction::Pop));
    }

    #[test]
    fn test_only_attribute_expressions_close_on_quote() {
        let grammar = Grammar::build(&LexerOptions::default()).unwrap();
        let closes_on_quote = |state: StateId| {
            grammar.rules(state).iter().any(|rule| match rule {
                Rule::Match { pattern, .. } => pattern.is_match("\""),
                _ => false,
            })
        };
        assert!(closes_on_quote(StateId::Expression));
        assert!(!closes_on_quote(StateId::Mustache));
        assert!(!closes_on_quote(StateId::Braces));
        let brace = &grammar.rules(StateId::Mustache)[1];
        assert_eq!(brace.action(), Some(StackAction::Push(StateId::Braces)));
    }

    #[test]
    fn test_script_states_follow_modes() {
        assert_eq!(StateId::for_script(ScriptMode::RegexAllowed), StateId::ScriptRegex);
        assert_eq!(StateId::for_script(ScriptMode::Template), StateId::ScriptTemplate);
        assert_eq!(StateId::ScriptTemplateHole.to_string(), "script-template-hole");
    }

    #[test]
    fn test_shared_grammar_is_reused() {
        let a = Grammar::shared(&LexerOptions::default());
        let b = Grammar::shared(&LexerOptions::default());
        assert!(std::ptr::eq(a, b));
        assert!(!Grammar::shared(&LexerOptions::opaque_attributes())
            .options()
            .expression_aware_attributes);
    }
}
