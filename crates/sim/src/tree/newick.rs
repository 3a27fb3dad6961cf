//! Newick reader.
//!
//! Accepts n-ary nodes, optional plain or single-quoted labels, optional
//! `:length` (scientific notation allowed), `[...]` comments and whitespace
//! anywhere between tokens, and a terminating `;`.

use super::{NodeId, Tree};
use crate::errors::NewickError;

/// Characters that end an unquoted label.
const LABEL_DELIMITERS: &[char] = &['(', ')', ',', ':', ';', '[', ']', '\''];

pub(super) fn parse(text: &str) -> Result<Tree, NewickError> {
    let mut reader = Reader {
        text,
        pos: 0,
        tree: Tree::new(),
    };

    let root = reader.parse_tree()?;
    reader.tree.set_root(root);

    reader.skip_comment_and_whitespace()?;
    reader.expect(';', "';' at end of tree")?;

    reader.skip_comment_and_whitespace()?;
    if reader.peek().is_some() {
        return Err(NewickError::TrailingInput {
            position: reader.pos,
        });
    }

    Ok(reader.tree)
}

struct Reader<'a> {
    text: &'a str,
    pos: usize,
    tree: Tree,
}

impl Reader<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn consume_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char, what: &'static str) -> Result<(), NewickError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(found) => Err(NewickError::UnexpectedChar {
                position: self.pos,
                found,
                expected: what,
            }),
            None => Err(NewickError::UnexpectedEnd { expected: what }),
        }
    }

    fn skip_comment_and_whitespace(&mut self) -> Result<(), NewickError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('[') => {
                    self.bump();
                    loop {
                        match self.bump() {
                            Some(']') => break,
                            Some(_) => {}
                            None => {
                                return Err(NewickError::UnexpectedEnd {
                                    expected: "']' closing comment",
                                })
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// `subtree := ['(' subtree (',' subtree)* ')'] [label] [':' length]`
    ///
    /// Open internal nodes are kept on an explicit stack, not the call stack.
    fn parse_tree(&mut self) -> Result<NodeId, NewickError> {
        let root = self.tree.push_node(None, None, None);
        let mut open: Vec<NodeId> = Vec::new();
        let mut current = root;

        loop {
            self.skip_comment_and_whitespace()?;
            if self.consume_if('(') {
                open.push(current);
                current = self.tree.push_node(Some(current), None, None);
                continue;
            }
            self.parse_node_label(current)?;

            // Close finished subtrees until a sibling starts or the root is done.
            loop {
                let Some(&parent) = open.last() else {
                    return Ok(root);
                };
                self.skip_comment_and_whitespace()?;
                match self.peek() {
                    Some(',') => {
                        self.bump();
                        current = self.tree.push_node(Some(parent), None, None);
                        break;
                    }
                    Some(')') => {
                        self.bump();
                        open.pop();
                        self.parse_node_label(parent)?;
                    }
                    Some(found) => {
                        return Err(NewickError::UnexpectedChar {
                            position: self.pos,
                            found,
                            expected: "',' or ')'",
                        })
                    }
                    None => {
                        return Err(NewickError::UnexpectedEnd {
                            expected: "',' or ')'",
                        })
                    }
                }
            }
        }
    }

    /// `[label] [':' length]` after a leaf or a closing parenthesis.
    fn parse_node_label(&mut self, id: NodeId) -> Result<(), NewickError> {
        self.skip_comment_and_whitespace()?;
        let label = self.parse_label()?;
        let length = self.parse_branch_length()?;
        self.tree.set_label(id, label, length);
        Ok(())
    }

    fn parse_label(&mut self) -> Result<Option<String>, NewickError> {
        if self.consume_if('\'') {
            let mut label = String::new();
            loop {
                match self.bump() {
                    // '' inside quotes is a literal quote
                    Some('\'') if self.consume_if('\'') => label.push('\''),
                    Some('\'') => return Ok(Some(label)),
                    Some(c) => label.push(c),
                    None => {
                        return Err(NewickError::UnexpectedEnd {
                            expected: "closing quote",
                        })
                    }
                }
            }
        }

        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || LABEL_DELIMITERS.contains(&c) {
                break;
            }
            self.bump();
        }
        let label = &self.text[start..self.pos];
        Ok((!label.is_empty()).then(|| label.to_string()))
    }

    fn parse_branch_length(&mut self) -> Result<Option<f64>, NewickError> {
        self.skip_comment_and_whitespace()?;
        if !self.consume_if(':') {
            return Ok(None);
        }
        self.skip_comment_and_whitespace()?;

        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
                self.bump();
            } else {
                break;
            }
        }
        let text = &self.text[start..self.pos];
        text.parse::<f64>()
            .map(Some)
            .map_err(|_| NewickError::InvalidBranchLength {
                position: start,
                text: text.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tree: &Tree, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| tree.node(id).name().unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn test_parse_example_tree() {
        let tree = parse("((A:0.5,B:0.5)D:0.5,C:1)E;").unwrap();
        assert_eq!(tree.len(), 5);

        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).name(), Some("E"));
        assert_eq!(names(&tree, tree.node(root).children()), vec!["D", "C"]);

        let d = tree.find("D").unwrap();
        assert_eq!(tree.node(d).branch_length(), Some(0.5));
        assert_eq!(names(&tree, tree.node(d).children()), vec!["A", "B"]);

        let c = tree.find("C").unwrap();
        assert_eq!(tree.node(c).branch_length(), Some(1.0));
        assert_eq!(tree.node(c).parent(), Some(root));
    }

    #[test]
    fn test_parse_multifurcation() {
        let tree = parse("(A:1,B:2,C:3,D:4)R;").unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).children().len(), 4);
    }

    #[test]
    fn test_parse_single_node() {
        let tree = parse("Solo;").unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(tree.root().unwrap()).name(), Some("Solo"));
    }

    #[test]
    fn test_parse_whitespace_comments_and_scientific() {
        let tree = parse(" ( A : 1.5e-2 [leaf] ,\n B:2E1 ) [root comment] R : 0 ;\n").unwrap();
        let a = tree.find("A").unwrap();
        assert!((tree.node(a).length() - 0.015).abs() < 1e-15);
        let b = tree.find("B").unwrap();
        assert_eq!(tree.node(b).length(), 20.0);
        assert_eq!(tree.node(tree.root().unwrap()).branch_length(), Some(0.0));
    }

    #[test]
    fn test_parse_quoted_labels() {
        let tree = parse("('node one':1,'it''s':2)'the root';").unwrap();
        assert!(tree.find("node one").is_some());
        assert!(tree.find("it's").is_some());
        assert_eq!(tree.node(tree.root().unwrap()).name(), Some("the root"));
    }

    #[test]
    fn test_parse_missing_labels_and_lengths() {
        let tree = parse("((A,B),C);").unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).name(), None);
        let inner = tree.node(root).children()[0];
        assert_eq!(tree.node(inner).name(), None);
        assert_eq!(tree.node(inner).branch_length(), None);
        assert_eq!(tree.node(inner).length(), 0.0);
    }

    #[test]
    fn test_parse_missing_semicolon() {
        assert_eq!(
            parse("(A:1,B:1)R").unwrap_err(),
            NewickError::UnexpectedEnd {
                expected: "';' at end of tree"
            }
        );
    }

    #[test]
    fn test_parse_unbalanced_parentheses() {
        assert!(matches!(
            parse("((A:1,B:1)R;"),
            Err(NewickError::UnexpectedChar { found: ';', .. })
        ));
    }

    #[test]
    fn test_parse_invalid_branch_length() {
        assert!(matches!(
            parse("(A:x,B:1)R;"),
            Err(NewickError::InvalidBranchLength { position: 3, .. })
        ));
        assert!(matches!(
            parse("(A:1e,B:1)R;"),
            Err(NewickError::InvalidBranchLength { .. })
        ));
    }

    #[test]
    fn test_parse_trailing_input() {
        assert_eq!(
            parse("(A,B)R; extra").unwrap_err(),
            NewickError::TrailingInput { position: 8 }
        );
    }

    #[test]
    fn test_parse_deep_caterpillar() {
        let depth = 10_000;
        let mut text = "(".repeat(depth);
        text.push_str("L0:1");
        for i in 1..=depth {
            text.push_str(&format!(",L{i}:1)I{i}:1"));
        }
        text.push(';');

        let tree = parse(&text).unwrap();
        assert_eq!(tree.len(), 2 * depth + 1);
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).name(), Some("I10000"));
        assert_eq!(names(&tree, tree.node(root).children()), vec!["I9999", "L10000"]);
        let bottom = tree.find("I1").unwrap();
        assert_eq!(names(&tree, tree.node(bottom).children()), vec!["L0", "L1"]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_parse_unterminated_comment() {
        assert!(matches!(
            parse("(A,B)R; [oops"),
            Err(NewickError::UnexpectedEnd { .. })
        ));
    }
}
