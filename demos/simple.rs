//! Parse a vCard, edit it and write it back.
//!
//! Run with: cargo run --example simple
//! Set `RUST_LOG=vcard=trace` to see the parser's progress.

use std::error::Error;
use tracing_subscriber::EnvFilter;
use vcard::{from_str, to_string, to_string_unfolded, Property};

const INPUT: &str = "BEGIN:VCARD\r
VERSION:3.0\r
FN:Forrest Gump\r
ORG:Bubba Gump Shrimp Co.\r
TEL;TYPE=WORK,VOICE:(111) 555-1212\r
TEL;TYPE=HOME,VOICE:(404) 555-1212\r
LABEL;TYPE=HOME:42 Plantation St.\\nBaytown\\, LA 30314\\nUnited States of Am\r
 erica\r
END:VCARD\r
";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut cards = from_str(INPUT)?;
    let card = &mut cards[0];

    for tel in card.get("TEL") {
        let kinds = tel.param("TYPE").unwrap_or_default().join("/");
        println!("{kinds}: {}", tel.value());
    }
    println!("label:\n{}\n", card.get("LABEL")[0].value());

    let mut email = Property::new("forrestgump@example.com");
    email.set_param("TYPE", ["INTERNET"]);
    card.add("EMAIL", email);

    println!("Unfolded:\n{}", to_string_unfolded(card));
    print!("Wire format:\n{}", to_string(card));

    Ok(())
}
