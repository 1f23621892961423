use alloc::string::{String, ToString};

use crate::{Buffer, BufferError, BufferOptions, TokenKind};

fn illegal(offset: usize, literal: &str) -> BufferError {
    BufferError::IllegalToken {
        offset,
        literal: String::from(literal),
    }
}

#[test]
fn illegal_token_is_reported() {
    let mut buf = Buffer::new();
    assert_eq!(buf.append("a @ b\n"), Err(illegal(2, "@")));
    assert!(!buf.is_ready());
    assert_eq!(buf.first_token(), TokenKind::Ident);
    assert_eq!(
        illegal(2, "@").to_string(),
        "illegal token \"@\" at offset 2"
    );
}

#[test]
fn illegal_token_poisons_until_reset() {
    let mut buf = Buffer::new();
    buf.append("x := #\n").unwrap_err();
    assert_eq!(buf.append("y\n"), Err(illegal(5, "#")));
    assert!(!buf.is_ready());

    buf.reset().unwrap();
    assert!(buf.is_empty());
    assert_eq!(buf.append("y\n"), Ok(2));
    assert_eq!(buf.as_str(), "y\n");
}

#[test]
fn illegal_token_after_the_boundary_waits_for_reset() {
    let mut buf = Buffer::new();
    assert_eq!(
        buf.append("x\n$\n"),
        Err(BufferError::ExtraInput {
            consumed: 2,
            remaining: 2
        })
    );
    assert_eq!(buf.as_str(), "x\n");
    assert_eq!(buf.reset(), Err(illegal(0, "$")));
    buf.reset().unwrap();
    assert!(buf.is_empty());
}

#[test]
fn illegal_token_inside_a_literal_is_fine() {
    let mut buf = Buffer::new();
    buf.append("s := \"@#$\" // ?\n").unwrap();
    assert!(buf.is_ready());
}

#[test]
fn too_large_leaves_the_buffer_untouched() {
    let mut buf = Buffer::with_options(BufferOptions { max_len: Some(8) });
    buf.append("f(\n").unwrap();
    assert_eq!(
        buf.append("a, b, c)\n"),
        Err(BufferError::TooLarge { len: 12, limit: 8 })
    );
    assert_eq!(buf.pending(), "f(\n");
    assert_eq!(buf.append("a)\n"), Ok(3));
    assert_eq!(buf.as_str(), "f(\na)\n");
}

#[test]
fn too_large_counts_the_whole_buffer() {
    let mut buf = Buffer::with_options(BufferOptions { max_len: Some(4) });
    assert_eq!(
        buf.append("what\n"),
        Err(BufferError::TooLarge { len: 5, limit: 4 })
    );
    assert!(buf.is_empty());
    assert_eq!(buf.options().max_len, Some(4));
}

#[test]
fn error_messages() {
    assert_eq!(
        BufferError::ExtraInput {
            consumed: 5,
            remaining: 4
        }
        .to_string(),
        "additional lines ignored: 5 bytes consumed, 4 bytes pending"
    );
    assert_eq!(
        BufferError::TooLarge { len: 5, limit: 4 }.to_string(),
        "input too large: 5 bytes exceeds the limit of 4"
    );
}
