use crate::types::{ParsedItem, ParsedSpan, Span, Sql, SqlBinding, SqlLiteral, SqlStatement};

use crate::error::{new_error, new_template_syntax_error, ErrorKind, Result};

use nom::{branch::alt,
          bytes::complete::{tag, take_while1},
          error::ErrorKind as NomErrorKind,
          multi::separated_nonempty_list,
          IResult, InputLength};

pub fn take_while_name_char(span: Span) -> IResult<Span, Span> {
    let (span, name) = take_while1(|c| match c {
        'a'..='z' => true,
        'A'..='Z' => true,
        '0'..='9' => true,
        '_' => true,
        _ => false,
    })(span)?;

    Ok((span, name))
}

pub fn qualifier(span: Span) -> IResult<Span, ParsedItem<String>> {
    let (span, name) = take_while_name_char(span)?;

    Ok((span, ParsedItem::from_span(name.fragment.to_string(), name)))
}

// {name} or {name.qualifier.qualifier}
pub fn binding_item(span: Span) -> IResult<Span, ParsedItem<SqlBinding>> {
    let (after_open, _) = tag("{")(span)?;

    let (after_path, qualifiers) = match separated_nonempty_list(tag("."), qualifier)(after_open) {
        Ok(ok) => ok,
        Err(_) => {
            return Err(nom::Err::Failure((
                after_open,
                NomErrorKind::SeparatedNonEmptyList,
            )))
        }
    };

    let (rest, _) = match tag::<_, _, (Span, NomErrorKind)>("}")(after_path) {
        Ok(ok) => ok,
        Err(_) => return Err(nom::Err::Failure((after_path, NomErrorKind::Tag))),
    };

    let path: Vec<String> = qualifiers.into_iter().map(|q| q.item).collect();
    let consumed = &span.fragment[..rest.offset - span.offset];

    let item = ParsedItem::new(
        SqlBinding::new(path),
        ParsedSpan::new(span.line, span.offset, consumed),
    );

    Ok((rest, item))
}

pub fn binding_sql(span: Span) -> IResult<Span, Sql> {
    let (span, b) = binding_item(span)?;

    Ok((span, Sql::Binding(b)))
}

// a full run of text up to the next delimiter, kept verbatim so rendering
// reproduces the template's placeholder positions exactly
pub fn literal_item(span: Span) -> IResult<Span, ParsedItem<SqlLiteral>> {
    let (span, text) = take_while1(|c| c != '{' && c != '}')(span)?;

    Ok((
        span,
        ParsedItem::from_span(SqlLiteral::new(text.fragment.to_string()), text),
    ))
}

pub fn literal_sql(span: Span) -> IResult<Span, Sql> {
    let (span, l) = literal_item(span)?;

    Ok((span, Sql::Literal(l)))
}

pub fn sql_sets(span: Span) -> IResult<Span, Sql> {
    alt((binding_sql, literal_sql))(span)
}

/// Compile a raw template into an ordered fragment list.
///
/// Any unbalanced or malformed `{`/`}` aborts the whole compilation with a
/// positioned syntax error.
pub fn template(span: Span) -> Result<SqlStatement> {
    let mut statement = SqlStatement::new(span.fragment.to_string());

    let mut rest = span;

    while rest.input_len() > 0 {
        match sql_sets(rest) {
            Ok((next, sql)) => {
                statement.push_sql(sql);
                rest = next;
            }
            Err(nom::Err::Error((at, kind))) | Err(nom::Err::Failure((at, kind))) => {
                return Err(new_error(ErrorKind::Syntax {
                    position: Some(ParsedSpan::from(at)),
                    err:      new_template_syntax_error(syntax_detail(&at, kind)),
                }));
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(new_error(ErrorKind::Syntax {
                    position: Some(ParsedSpan::from(rest)),
                    err:      new_template_syntax_error("incomplete parameter substitution"),
                }));
            }
        }
    }

    Ok(statement)
}

fn syntax_detail(at: &Span, kind: NomErrorKind) -> &'static str {
    match kind {
        NomErrorKind::SeparatedNonEmptyList => "expected parameter name after '{'",
        NomErrorKind::Tag => "expected '}' to close parameter substitution",
        _ => {
            if at.fragment.starts_with('}') {
                "unbalanced '}' with no opening '{'"
            }
            else {
                "malformed parameter substitution"
            }
        }
    }
}
