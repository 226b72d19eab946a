//! RFC 4512 definition parser.
//!
//! Parses the textual form of one definition into a typed description.
//! Descriptions are plain data; registering them in a [`Schema`] goes
//! through the [`Build`] trait, usually via the `Schema::parse_*` entry
//! points.
//!
//! [`Schema`]: crate::Schema
//!
//! # Examples
//!
//! ```rust
//! use ldap_schema::parser::parse_object_class;
//! use ldap_schema::Kind;
//!
//! let person = parse_object_class(
//!     "( 2.5.6.6 NAME 'person' SUP top STRUCTURAL MUST ( sn $ cn ) )",
//! )
//! .unwrap();
//! assert_eq!(person.oid, "2.5.6.6");
//! assert_eq!(person.kind, Some(Kind::Structural));
//! assert_eq!(person.must, vec!["sn", "cn"]);
//! ```

pub mod build;
pub mod description;
pub mod lexer;

pub use build::Build;
pub use description::{
    AttributeTypeDescription, DitContentRuleDescription, DitStructureRuleDescription, Header,
    LdapSyntaxDescription, MatchingRuleDescription, NameFormDescription, ObjectClassDescription,
};

use crate::error::{SchemaError, SchemaResult};
use crate::oid::{RuleId, is_descriptor};
use crate::schema::{Kind, Usage};
use lexer::{Lexer, Span, Token, TokenKind, unescape};

/// Recursive-descent parser over the token stream of one definition.
struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    /// Clause keywords already consumed, for duplicate detection
    seen: Vec<String>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> SchemaResult<Self> {
        Ok(Self {
            source,
            tokens: Lexer::new(source).tokenize()?,
            pos: 0,
            seen: Vec::new(),
        })
    }

    fn peek(&self) -> Token {
        self.tokens.get(self.pos).copied().unwrap_or(Token {
            kind: TokenKind::Eof,
            span: Span {
                start: self.source.len(),
                end: self.source.len(),
            },
        })
    }

    fn advance(&mut self) -> Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn text(&self, token: Token) -> &'src str {
        &self.source[token.span.start..token.span.end]
    }

    fn error(&self, token: Token, message: impl Into<String>) -> SchemaError {
        SchemaError::parse(token.span.start, message)
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> SchemaResult<Token> {
        let token = self.advance();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.error(token, format!("expected {what}")))
        }
    }

    fn word(&mut self, what: &str) -> SchemaResult<(Token, &'src str)> {
        let token = self.expect(TokenKind::Word, what)?;
        Ok((token, self.text(token)))
    }

    /// Opening parenthesis followed by the leading identifier.
    fn start(&mut self, what: &str) -> SchemaResult<(Token, &'src str)> {
        self.expect(TokenKind::LParen, "'('")?;
        self.word(what)
    }

    /// Next clause keyword, or `None` once the closing parenthesis ends the
    /// definition. Keywords are returned upper-cased.
    fn next_keyword(&mut self) -> SchemaResult<Option<(Token, String)>> {
        let token = self.advance();
        match token.kind {
            TokenKind::RParen => {
                let trailing = self.advance();
                if trailing.kind != TokenKind::Eof {
                    return Err(self.error(trailing, "unexpected input after ')'"));
                }
                Ok(None)
            }
            TokenKind::Word => {
                let keyword = self.text(token).to_ascii_uppercase();
                if self.seen.contains(&keyword) {
                    return Err(self.error(token, format!("duplicate {keyword} clause")));
                }
                self.seen.push(keyword.clone());
                Ok(Some((token, keyword)))
            }
            TokenKind::Eof => Err(self.error(token, "expected ')'")),
            _ => Err(self.error(token, "expected a clause keyword")),
        }
    }

    fn qdstring(&mut self) -> SchemaResult<String> {
        let token = self.expect(TokenKind::Quoted, "quoted string")?;
        let raw = self.text(token);
        unescape(&raw[1..raw.len() - 1], token.span.start + 1)
    }

    /// `qdstring` or `( qdstring ... )`.
    fn qdstrings(&mut self) -> SchemaResult<Vec<String>> {
        if self.peek().kind != TokenKind::LParen {
            return Ok(vec![self.qdstring()?]);
        }
        self.advance();
        let mut values = Vec::new();
        while self.peek().kind == TokenKind::Quoted {
            values.push(self.qdstring()?);
        }
        self.expect(TokenKind::RParen, "')'")?;
        if values.is_empty() {
            return Err(self.error(self.peek(), "empty value list"));
        }
        Ok(values)
    }

    /// `qdescrs`: one or more quoted descriptors.
    fn qdescrs(&mut self) -> SchemaResult<Vec<String>> {
        let at = self.peek();
        let names = self.qdstrings()?;
        if let Some(bad) = names.iter().find(|name| !is_descriptor(name)) {
            return Err(self.error(at, format!("invalid descriptor '{bad}'")));
        }
        Ok(names)
    }

    fn oid(&mut self) -> SchemaResult<String> {
        let (_, text) = self.word("OID")?;
        Ok(text.to_string())
    }

    /// `oids`: a single OID or `( oid $ oid ... )`.
    fn oids(&mut self) -> SchemaResult<Vec<String>> {
        if self.peek().kind != TokenKind::LParen {
            return Ok(vec![self.oid()?]);
        }
        self.advance();
        let mut values = vec![self.oid()?];
        loop {
            match self.peek().kind {
                TokenKind::Dollar => {
                    self.advance();
                    values.push(self.oid()?);
                }
                // Tolerate lists separated by whitespace only
                TokenKind::Word => values.push(self.oid()?),
                _ => break,
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(values)
    }

    /// `noidlen`: an OID with an optional `{len}` suffix.
    fn noidlen(&mut self) -> SchemaResult<(String, Option<u32>)> {
        let (token, text) = self.word("syntax OID")?;
        let Some((oid, bound)) = text.split_once('{') else {
            return Ok((text.to_string(), None));
        };
        let bound = bound
            .strip_suffix('}')
            .and_then(|len| len.parse::<u32>().ok())
            .ok_or_else(|| self.error(token, format!("invalid length bound in '{text}'")))?;
        Ok((oid.to_string(), Some(bound)))
    }

    fn rule_id(&mut self) -> SchemaResult<RuleId> {
        let (token, text) = self.word("rule ID")?;
        text.parse()
            .map_err(|_| self.error(token, format!("invalid rule ID '{text}'")))
    }

    /// `ruleids`: a single rule ID or a space separated list in parentheses.
    fn rule_ids(&mut self) -> SchemaResult<Vec<RuleId>> {
        if self.peek().kind != TokenKind::LParen {
            return Ok(vec![self.rule_id()?]);
        }
        self.advance();
        let mut ids = Vec::new();
        while self.peek().kind == TokenKind::Word {
            ids.push(self.rule_id()?);
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(ids)
    }

    /// Clauses every kind shares; anything else is an error.
    fn header_clause(
        &mut self,
        token: Token,
        keyword: &str,
        header: &mut Header,
    ) -> SchemaResult<()> {
        match keyword {
            "NAME" => header.names = self.qdescrs()?,
            "DESC" => header.description = Some(self.qdstring()?),
            "OBSOLETE" => header.obsolete = true,
            _ if keyword.starts_with("X-") => {
                let label = self.text(token).to_string();
                let values = self.qdstrings()?;
                header.extensions.push((label, values));
            }
            _ => return Err(self.error(token, format!("unexpected '{}'", self.text(token)))),
        }
        Ok(())
    }
}

/// Parse an LDAP syntax description.
pub fn parse_ldap_syntax(input: &str) -> SchemaResult<LdapSyntaxDescription> {
    let mut parser = Parser::new(input)?;
    let (_, oid) = parser.start("numeric OID")?;
    let mut description = LdapSyntaxDescription {
        oid: oid.to_string(),
        ..Default::default()
    };
    while let Some((token, keyword)) = parser.next_keyword()? {
        parser.header_clause(token, &keyword, &mut description.header)?;
    }
    Ok(description)
}

/// Parse a matching rule description.
pub fn parse_matching_rule(input: &str) -> SchemaResult<MatchingRuleDescription> {
    let mut parser = Parser::new(input)?;
    let (_, oid) = parser.start("numeric OID")?;
    let mut description = MatchingRuleDescription {
        oid: oid.to_string(),
        ..Default::default()
    };
    while let Some((token, keyword)) = parser.next_keyword()? {
        match keyword.as_str() {
            "SYNTAX" => description.syntax = Some(parser.oid()?),
            _ => parser.header_clause(token, &keyword, &mut description.header)?,
        }
    }
    Ok(description)
}

/// Parse an attribute type description.
pub fn parse_attribute_type(input: &str) -> SchemaResult<AttributeTypeDescription> {
    let mut parser = Parser::new(input)?;
    let (_, oid) = parser.start("numeric OID")?;
    let mut description = AttributeTypeDescription {
        oid: oid.to_string(),
        ..Default::default()
    };
    while let Some((token, keyword)) = parser.next_keyword()? {
        match keyword.as_str() {
            "SUP" => description.super_type = Some(parser.oid()?),
            "EQUALITY" => description.equality = Some(parser.oid()?),
            "ORDERING" => description.ordering = Some(parser.oid()?),
            "SUBSTR" => description.substring = Some(parser.oid()?),
            "SYNTAX" => {
                let (syntax, bound) = parser.noidlen()?;
                description.syntax = Some(syntax);
                description.min_upper_bounds = bound;
            }
            "SINGLE-VALUE" => description.single_value = true,
            "COLLECTIVE" => description.collective = true,
            "NO-USER-MODIFICATION" => description.no_user_modification = true,
            "USAGE" => {
                let (token, text) = parser.word("usage")?;
                let usage = text
                    .parse::<Usage>()
                    .map_err(|_| parser.error(token, format!("unknown usage '{text}'")))?;
                description.usage = Some(usage);
            }
            _ => parser.header_clause(token, &keyword, &mut description.header)?,
        }
    }
    Ok(description)
}

/// Parse an object class description.
pub fn parse_object_class(input: &str) -> SchemaResult<ObjectClassDescription> {
    let mut parser = Parser::new(input)?;
    let (_, oid) = parser.start("numeric OID")?;
    let mut description = ObjectClassDescription {
        oid: oid.to_string(),
        ..Default::default()
    };
    while let Some((token, keyword)) = parser.next_keyword()? {
        match keyword.as_str() {
            "SUP" => description.super_classes = parser.oids()?,
            "ABSTRACT" | "STRUCTURAL" | "AUXILIARY" => {
                if description.kind.is_some() {
                    return Err(parser.error(token, "conflicting object class kinds"));
                }
                description.kind = keyword.parse::<Kind>().ok();
            }
            "MUST" => description.must = parser.oids()?,
            "MAY" => description.may = parser.oids()?,
            _ => parser.header_clause(token, &keyword, &mut description.header)?,
        }
    }
    Ok(description)
}

/// Parse a name form description.
pub fn parse_name_form(input: &str) -> SchemaResult<NameFormDescription> {
    let mut parser = Parser::new(input)?;
    let (_, oid) = parser.start("numeric OID")?;
    let mut description = NameFormDescription {
        oid: oid.to_string(),
        ..Default::default()
    };
    while let Some((token, keyword)) = parser.next_keyword()? {
        match keyword.as_str() {
            "OC" => description.structural_class = Some(parser.oid()?),
            "MUST" => description.must = parser.oids()?,
            "MAY" => description.may = parser.oids()?,
            _ => parser.header_clause(token, &keyword, &mut description.header)?,
        }
    }
    Ok(description)
}

/// Parse a DIT content rule description.
pub fn parse_dit_content_rule(input: &str) -> SchemaResult<DitContentRuleDescription> {
    let mut parser = Parser::new(input)?;
    let (_, oid) = parser.start("numeric OID")?;
    let mut description = DitContentRuleDescription {
        oid: oid.to_string(),
        ..Default::default()
    };
    while let Some((token, keyword)) = parser.next_keyword()? {
        match keyword.as_str() {
            "AUX" => description.aux = parser.oids()?,
            "MUST" => description.must = parser.oids()?,
            "MAY" => description.may = parser.oids()?,
            "NOT" => description.not = parser.oids()?,
            _ => parser.header_clause(token, &keyword, &mut description.header)?,
        }
    }
    Ok(description)
}

/// Parse a DIT structure rule description.
pub fn parse_dit_structure_rule(input: &str) -> SchemaResult<DitStructureRuleDescription> {
    let mut parser = Parser::new(input)?;
    parser.expect(TokenKind::LParen, "'('")?;
    let rule_id = parser.rule_id()?;
    let mut description = DitStructureRuleDescription {
        rule_id,
        header: Header::default(),
        form: None,
        superiors: Vec::new(),
    };
    while let Some((token, keyword)) = parser.next_keyword()? {
        match keyword.as_str() {
            "FORM" => description.form = Some(parser.oid()?),
            "SUP" => description.superiors = parser.rule_ids()?,
            _ => parser.header_clause(token, &keyword, &mut description.header)?,
        }
    }
    Ok(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attribute_type_clauses() {
        let at = parse_attribute_type(
            "( 2.5.4.41 NAME 'name' DESC 'RFC4519: common supertype of name attributes' \
             EQUALITY caseIgnoreMatch SUBSTR caseIgnoreSubstringsMatch \
             SYNTAX 1.3.6.1.4.1.1466.115.121.1.15{32768} X-ORIGIN 'RFC 4519' )",
        )
        .unwrap();
        assert_eq!(at.oid, "2.5.4.41");
        assert_eq!(at.header.names, vec!["name"]);
        assert_eq!(at.equality.as_deref(), Some("caseIgnoreMatch"));
        assert_eq!(at.substring.as_deref(), Some("caseIgnoreSubstringsMatch"));
        assert_eq!(at.syntax.as_deref(), Some("1.3.6.1.4.1.1466.115.121.1.15"));
        assert_eq!(at.min_upper_bounds, Some(32768));
        assert_eq!(
            at.header.extensions,
            vec![("X-ORIGIN".to_string(), vec!["RFC 4519".to_string()])]
        );
    }

    #[test]
    fn test_parse_operational_attribute() {
        let at = parse_attribute_type(
            "( 2.5.18.1 NAME 'createTimestamp' EQUALITY generalizedTimeMatch \
             ORDERING generalizedTimeOrderingMatch SYNTAX 1.3.6.1.4.1.1466.115.121.1.24 \
             SINGLE-VALUE NO-USER-MODIFICATION USAGE directoryOperation )",
        )
        .unwrap();
        assert!(at.single_value);
        assert!(at.no_user_modification);
        assert_eq!(at.usage, Some(Usage::DirectoryOperation));
    }

    #[test]
    fn test_parse_object_class_lists() {
        let oc = parse_object_class(
            "( 2.5.6.7 NAME 'organizationalPerson' SUP person STRUCTURAL \
             MAY ( title $ x121Address $ registeredAddress ) )",
        )
        .unwrap();
        assert_eq!(oc.super_classes, vec!["person"]);
        assert_eq!(oc.may.len(), 3);
        assert!(oc.must.is_empty());
    }

    #[test]
    fn test_parse_macro_oid() {
        let at = parse_attribute_type("( nisSchema.1.0 NAME 'uidNumber' )").unwrap();
        assert_eq!(at.oid, "nisSchema.1.0");
    }

    #[test]
    fn test_parse_structure_rule() {
        let rule = parse_dit_structure_rule("( 2 NAME 'child' FORM personForm SUP ( 1 2 ) )")
            .unwrap();
        assert_eq!(rule.rule_id, RuleId::new(2));
        assert_eq!(rule.form.as_deref(), Some("personForm"));
        assert_eq!(rule.superiors, vec![RuleId::new(1), RuleId::new(2)]);
    }

    #[test]
    fn test_parse_escaped_description() {
        let syntax =
            parse_ldap_syntax("( 1.3.6.1.4.1.1466.115.121.1.15 DESC 'it\\27s a \\5C' )").unwrap();
        assert_eq!(syntax.header.description.as_deref(), Some("it's a \\"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_attribute_type("2.5.4.3 NAME 'cn' )"),
            Err(SchemaError::Parse { offset: 0, .. })
        ));
        assert!(parse_attribute_type("( 2.5.4.3 NAME 'cn'").is_err());
        assert!(parse_attribute_type("( 2.5.4.3 NAME 'cn' NAME 'sn' )").is_err());
        assert!(parse_attribute_type("( 2.5.4.3 NAME '1cn' )").is_err());
        assert!(parse_attribute_type("( 2.5.4.3 BOGUS )").is_err());
        assert!(parse_attribute_type("( 2.5.4.3 ) trailing").is_err());
        assert!(parse_object_class("( 2.5.6.0 ABSTRACT STRUCTURAL )").is_err());
        assert!(parse_attribute_type("( 2.5.4.3 SYNTAX 1.2.3{x} )").is_err());
    }
}
