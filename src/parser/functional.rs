//! This works the following way:
//! 1. Split the document into tokens (brackets, IRIs, literals, names)
//! 2. Build a tree of nested `Name(...)` lists
//! 3. Interpret prefixes, declarations, equivalence axioms and annotations
//!
//! Only the constructs that [`Ontology::write`] produces are interpreted.
//! Other axioms are ignored.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::trace;

use crate::expression::{LogicalExpression, RelationKind};
use crate::ontology::{Annotation, AnnotationProperty, AnnotationValue, Ontology};
use crate::term::{obo_iri_to_id, ZpTermId};
use crate::{ZpError, ZpResult, OBO_IRI};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    Iri(String),
    Literal(String),
    Name(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Iri(String),
    Literal(String),
    Name(String),
    List(String, Vec<Node>),
}

fn invalid<T>(msg: &str) -> ZpResult<T> {
    Err(ZpError::InvalidInput(msg.to_string()))
}

fn tokenize(document: &str) -> ZpResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = document.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '#' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            '<' => {
                let mut iri = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some(c) => iri.push(c),
                        None => return invalid("unterminated IRI"),
                    }
                }
                tokens.push(Token::Iri(iri));
            }
            '"' => {
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c) => literal.push(c),
                            None => return invalid("unterminated literal"),
                        },
                        Some(c) => literal.push(c),
                        None => return invalid("unterminated literal"),
                    }
                }
                // datatype (`^^xsd:string`) and language tags are dropped
                if chars.peek() == Some(&'^') {
                    chars.next();
                    chars.next();
                    if chars.peek() == Some(&'<') {
                        for c in chars.by_ref() {
                            if c == '>' {
                                break;
                            }
                        }
                    } else {
                        skip_name(&mut chars);
                    }
                } else if chars.peek() == Some(&'@') {
                    skip_name(&mut chars);
                }
                tokens.push(Token::Literal(literal));
            }
            c => {
                let mut name = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || matches!(next, '(' | ')' | '<' | '"') {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                tokens.push(Token::Name(name));
            }
        }
    }
    Ok(tokens)
}

fn skip_name<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) {
    while let Some(&next) = chars.peek() {
        if next.is_whitespace() || matches!(next, '(' | ')') {
            break;
        }
        chars.next();
    }
}

/// Builds the tree of nodes from the token stream
fn nodes(tokens: Vec<Token>) -> ZpResult<Vec<Node>> {
    // each stack frame holds the name of the open list and its children
    let mut stack: Vec<(String, Vec<Node>)> = vec![(String::new(), Vec::new())];
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        let node = match token {
            Token::Name(name) if tokens.peek() == Some(&Token::Open) => {
                tokens.next();
                stack.push((name, Vec::new()));
                continue;
            }
            Token::Name(name) => Node::Name(name),
            Token::Iri(iri) => Node::Iri(iri),
            Token::Literal(literal) => Node::Literal(literal),
            Token::Open => return invalid("opening bracket without a name"),
            Token::Close => {
                if stack.len() < 2 {
                    return invalid("unbalanced closing bracket");
                }
                let Some((name, children)) = stack.pop() else {
                    return invalid("unbalanced closing bracket");
                };
                Node::List(name, children)
            }
        };
        match stack.last_mut() {
            Some((_, children)) => children.push(node),
            None => return invalid("unbalanced closing bracket"),
        }
    }

    match stack.pop() {
        Some((_, children)) if stack.is_empty() => Ok(children),
        _ => invalid("unclosed bracket at end of document"),
    }
}

struct Reader {
    prefixes: HashMap<String, String>,
    ontology: Ontology,
}

impl Reader {
    fn new() -> Self {
        let mut prefixes = HashMap::new();
        prefixes.insert("obo".to_string(), OBO_IRI.to_string());
        prefixes.insert(
            "rdfs".to_string(),
            "http://www.w3.org/2000/01/rdf-schema#".to_string(),
        );
        prefixes.insert("owl".to_string(), "http://www.w3.org/2002/07/owl#".to_string());
        Self {
            prefixes,
            ontology: Ontology::default(),
        }
    }

    /// Expands a prefixed name or returns the full IRI
    fn iri(&self, node: &Node) -> ZpResult<String> {
        match node {
            Node::Iri(iri) => Ok(iri.clone()),
            Node::Name(name) => {
                let Some((prefix, local)) = name.split_once(':') else {
                    return Err(ZpError::InvalidInput(format!("not an IRI: {name}")));
                };
                match self.prefixes.get(prefix) {
                    Some(base) => Ok(format!("{base}{local}")),
                    None => Err(ZpError::InvalidInput(format!("unknown prefix: {prefix}"))),
                }
            }
            _ => invalid("expected an IRI"),
        }
    }

    fn zp_id(&self, node: &Node) -> Option<ZpTermId> {
        let iri = self.iri(node).ok()?;
        let id = obo_iri_to_id(&iri)?;
        if id.starts_with("ZP:") {
            ZpTermId::try_from(id.as_str()).ok()
        } else {
            None
        }
    }

    fn expression(&self, node: &Node) -> ZpResult<LogicalExpression> {
        match node {
            Node::List(name, operands) if name == "ObjectIntersectionOf" => {
                let operands = operands
                    .iter()
                    .map(|op| self.expression(op))
                    .collect::<ZpResult<Vec<_>>>()?;
                Ok(LogicalExpression::Intersection(operands))
            }
            Node::List(name, args) if name == "ObjectSomeValuesFrom" => {
                let [property, filler] = args.as_slice() else {
                    return invalid("ObjectSomeValuesFrom requires property and filler");
                };
                let property = self.iri(property)?;
                let relation = obo_iri_to_id(&property)
                    .and_then(|id| RelationKind::from_obo_id(&id))
                    .ok_or_else(|| {
                        ZpError::InvalidInput(format!("unknown object property: {property}"))
                    })?;
                Ok(LogicalExpression::some(relation, self.expression(filler)?))
            }
            Node::List(name, _) => Err(ZpError::InvalidInput(format!(
                "unsupported class expression: {name}"
            ))),
            node => {
                let iri = self.iri(node)?;
                match obo_iri_to_id(&iri) {
                    Some(id) => Ok(LogicalExpression::TermRef(id)),
                    None => Err(ZpError::InvalidInput(format!("not an OBO class: {iri}"))),
                }
            }
        }
    }

    fn prefix(&mut self, args: &[Node]) -> ZpResult<()> {
        let [Node::Name(name), Node::Iri(iri)] = args else {
            return invalid("malformed Prefix declaration");
        };
        let name = name.trim_end_matches('=').trim_end_matches(':');
        self.prefixes.insert(name.to_string(), iri.clone());
        Ok(())
    }

    fn axiom(&mut self, node: &Node) -> ZpResult<()> {
        let Node::List(name, args) = node else {
            // ontology and version IRI
            return Ok(());
        };
        // axiom annotations come first and are not needed
        let args: Vec<&Node> = args
            .iter()
            .skip_while(|arg| matches!(arg, Node::List(name, _) if name == "Annotation"))
            .collect();

        match (name.as_str(), args.as_slice()) {
            ("Declaration", [Node::List(kind, entity)]) if kind == "Class" => {
                if let Some(id) = entity.first().and_then(|e| self.zp_id(e)) {
                    self.ontology.declare(id);
                }
            }
            ("EquivalentClasses", operands) => {
                let Some(id) = operands.iter().find_map(|op| self.zp_id(op)) else {
                    trace!("Ignoring equivalence without ZP class");
                    return Ok(());
                };
                for op in operands {
                    if self.zp_id(op) == Some(id) {
                        continue;
                    }
                    let expression = self.expression(op)?;
                    self.ontology.add_equivalence(id, expression);
                }
            }
            ("AnnotationAssertion", [property, subject, value]) => {
                let Some(id) = self.zp_id(subject) else {
                    trace!("Ignoring annotation of non ZP subject");
                    return Ok(());
                };
                let property = AnnotationProperty::from_iri(&self.iri(property)?);
                let value = match value {
                    Node::Literal(text) => AnnotationValue::Literal(text.clone()),
                    other => AnnotationValue::Iri(self.iri(other)?),
                };
                self.ontology
                    .add_annotation(id, Annotation::new(property, value));
            }
            (other, _) => trace!("Ignoring {}", other),
        }
        Ok(())
    }

    fn document(&mut self, nodes: &[Node]) -> ZpResult<()> {
        for node in nodes {
            match node {
                Node::List(name, args) if name == "Prefix" => self.prefix(args)?,
                Node::List(name, axioms) if name == "Ontology" => {
                    for axiom in axioms {
                        self.axiom(axiom)?;
                    }
                }
                _ => return invalid("expected Prefix or Ontology"),
            }
        }
        Ok(())
    }
}

/// Parses an OWL functional syntax document into an [`Ontology`]
pub(crate) fn parse(document: &str) -> ZpResult<Ontology> {
    let nodes = nodes(tokenize(document)?)?;
    let mut reader = Reader::new();
    reader.document(&nodes)?;
    Ok(reader.ontology)
}

/// Reads an OWL functional syntax file into an [`Ontology`]
pub(crate) fn read_file(path: &Path) -> ZpResult<Ontology> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}
