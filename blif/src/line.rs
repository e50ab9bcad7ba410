use pest::Parser;

use crate::{ParseError, preparse::LogicalLine};

#[derive(pest_derive::Parser)]
#[grammar = "blif.pest"]
struct LineParser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Directive {
    Model,
    Inputs,
    Outputs,
    Names,
    Latch,
    Reset,
    Subckt,
    Blackbox,
    Exdc,
    LtlFormula,
    End,
    Other(String),
}

impl Directive {
    fn from_keyword(keyword: &str) -> Directive {
        match keyword {
            "model" => Directive::Model,
            "inputs" => Directive::Inputs,
            "outputs" => Directive::Outputs,
            "names" => Directive::Names,
            "latch" => Directive::Latch,
            "reset" => Directive::Reset,
            "subckt" => Directive::Subckt,
            "blackbox" => Directive::Blackbox,
            "exdc" => Directive::Exdc,
            "ltlformula" => Directive::LtlFormula,
            "end" => Directive::End,
            _ => Directive::Other(keyword.to_owned()),
        }
    }
}

/// A tokenized logical line. Lines without a directive are table rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line {
    pub number: usize,
    pub directive: Option<Directive>,
    pub args: Vec<String>,
}

pub(crate) fn tokenize(line: &LogicalLine) -> Result<Line, ParseError> {
    let mut pairs = LineParser::parse(Rule::line, &line.text)
        .map_err(|err| ParseError::at(line.number, format!("malformed line: {}", err.variant.message())))?;
    let mut result = Line { number: line.number, directive: None, args: Vec::new() };
    let Some(pair) = pairs.next() else {
        unreachable!();
    };
    for pair in pair.into_inner() {
        match pair.as_rule() {
            Rule::directive => result.directive = Some(Directive::from_keyword(&pair.as_str()[1..])),
            Rule::string => {
                let quoted = pair.as_str();
                result.args.push(quoted[1..quoted.len() - 1].to_owned());
            }
            Rule::word => result.args.push(pair.as_str().to_owned()),
            Rule::EOI => (),
            _ => unreachable!(),
        }
    }
    Ok(result)
}

#[cfg(test)]
mod test {
    use super::{Directive, Line, tokenize};
    use crate::preparse::LogicalLine;

    fn line(text: &str) -> LogicalLine {
        LogicalLine { number: 7, text: text.to_owned() }
    }

    #[test]
    fn test_directive() {
        assert_eq!(
            tokenize(&line(".names a b\ty")).unwrap(),
            Line {
                number: 7,
                directive: Some(Directive::Names),
                args: vec!["a".into(), "b".into(), "y".into()],
            }
        );
        assert_eq!(
            tokenize(&line(".default_input_arrival 0 0")).unwrap().directive,
            Some(Directive::Other("default_input_arrival".into()))
        );
    }

    #[test]
    fn test_row() {
        let row = tokenize(&line("1-0 1")).unwrap();
        assert_eq!(row.directive, None);
        assert_eq!(row.args, vec!["1-0".to_owned(), "1".to_owned()]);
    }

    #[test]
    fn test_string() {
        let row = tokenize(&line(".ltlformula \"G (a -> F b)\"")).unwrap();
        assert_eq!(row.directive, Some(Directive::LtlFormula));
        assert_eq!(row.args, vec!["G (a -> F b)".to_owned()]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize(&line(".ltlformula \"G a")).unwrap_err();
        assert!(err.to_string().starts_with("line 7: malformed line"));
    }
}
