use crate::types::value::{Access, Resolve};
use crate::types::{ParsedItem, ParsedSpan, Sql, SqlBinding, SqlLiteral};

use std::fmt::Debug;

pub fn build_parsed_item<T: Debug + Default + PartialEq + Clone>(
    item: T,
    line: Option<u32>,
    offset: Option<usize>,
    fragment: &str,
) -> ParsedItem<T> {
    let position = ParsedSpan::new(line.unwrap_or(1), offset.unwrap_or(0), fragment);

    ParsedItem::new(item, position)
}

pub fn build_parsed_binding_item(
    path: &[&str],
    line: Option<u32>,
    offset: Option<usize>,
    fragment: &str,
) -> ParsedItem<SqlBinding> {
    let binding = SqlBinding::new(path.iter().map(|q| q.to_string()).collect());

    build_parsed_item(binding, line, offset, fragment)
}

pub fn build_parsed_sql_binding(
    path: &[&str],
    line: Option<u32>,
    offset: Option<usize>,
    fragment: &str,
) -> Sql {
    Sql::Binding(build_parsed_binding_item(path, line, offset, fragment))
}

pub fn build_parsed_sql_literal(
    item: &str,
    line: Option<u32>,
    offset: Option<usize>,
    fragment: &str,
) -> Sql {
    Sql::Literal(build_parsed_item(
        SqlLiteral::new(item.to_string()),
        line,
        offset,
        fragment,
    ))
}

/// Fixture with both a boolean-style and a general accessor for the same
/// qualifiers, to pin down strategy precedence.
pub struct Customer {
    active: bool,
    name:   String,
}

impl Resolve for Customer {
    fn is_accessor(&self, name: &str) -> Access {
        match name {
            "active" => Access::value(&self.active),
            // boolean-style accessor with a non-boolean result
            "name" => Access::value(&"WRONG"),
            _ => Access::NotFound,
        }
    }

    fn get_accessor(&self, name: &str) -> Access {
        match name {
            "active" => Access::value(&"textual active"),
            "name" => Access::value(&self.name),
            _ => Access::NotFound,
        }
    }
}

pub fn build_customer() -> Customer {
    Customer {
        active: true,
        name:   "Ada".to_string(),
    }
}

#[derive(Clone)]
pub struct Address {
    city: String,
    zip:  String,
}

impl Resolve for Address {
    fn get_accessor(&self, name: &str) -> Access {
        match name {
            "city" => Access::value(&self.city),
            _ => Access::NotFound,
        }
    }

    fn field(&self, name: &str) -> Access {
        match name {
            "zip" => Access::value(&self.zip),
            _ => Access::NotFound,
        }
    }
}

pub struct Person {
    id:   i64,
    addr: Address,
}

impl Resolve for Person {
    fn get_accessor(&self, name: &str) -> Access {
        match name {
            "addr" => Access::object(self.addr.clone()),
            _ => Access::NotFound,
        }
    }

    fn field(&self, name: &str) -> Access {
        match name {
            "id" => Access::value(&self.id),
            _ => Access::NotFound,
        }
    }
}

pub fn build_person() -> Person {
    Person {
        id:   7,
        addr: Address {
            city: "Basin City".to_string(),
            zip:  "00001".to_string(),
        },
    }
}

/// Fixture whose accessors exist but are barred by visibility.
pub struct Vault;

impl Resolve for Vault {
    fn get_accessor(&self, name: &str) -> Access {
        match name {
            "combination" => Access::denied("private accessor"),
            _ => Access::NotFound,
        }
    }
}

pub fn build_vault() -> Vault {
    Vault
}

/// Fixture whose accessor raises during invocation.
pub struct Ledger;

impl Resolve for Ledger {
    fn get_accessor(&self, name: &str) -> Access {
        match name {
            "balance" => Access::failed("ledger backend offline"),
            _ => Access::NotFound,
        }
    }
}

pub fn build_ledger() -> Ledger {
    Ledger
}
