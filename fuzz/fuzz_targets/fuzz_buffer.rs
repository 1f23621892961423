#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use replbuf::{Buffer, BufferError, BufferOptions, TokenKind, parse_ready};

#[derive(Debug, Arbitrary)]
struct Session {
    max_len: Option<u16>,
    chunks: Vec<String>,
}

fuzz_target!(|session: Session| {
    let mut buf = Buffer::with_options(BufferOptions {
        max_len: session.max_len.map(usize::from),
    });

    for chunk in &session.chunks {
        let before = buf.len();
        let mut status = buf.append(chunk);
        match &status {
            Ok(accepted) => assert_eq!(*accepted, chunk.len()),
            Err(BufferError::ExtraInput { consumed, .. }) => assert!(*consumed <= chunk.len()),
            Err(BufferError::TooLarge { .. }) => assert_eq!(buf.len(), before),
            Err(BufferError::IllegalToken { .. }) => assert!(!buf.is_ready()),
        }

        // Every reset either empties the buffer or hands out a unit.
        let mut rounds = 0;
        while buf.is_ready() || status.is_err() {
            if buf.is_ready() {
                assert_eq!(buf.tokens().last(), Some(&TokenKind::Semicolon));
                assert!(buf.len() >= buf.as_str().len());
                // Errors are fine; contract panics are not.
                let _ = parse_ready(&buf);
            }
            if matches!(status, Err(BufferError::TooLarge { .. })) {
                break;
            }
            rounds += 1;
            assert!(rounds <= before + chunk.len() + 1, "reset loop does not terminate");
            status = buf.reset().map(|()| 0);
        }
    }
});
