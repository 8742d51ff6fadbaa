#![cfg(feature = "alloc")]

use lexpos::{CompileError, TokenSpec, compile};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
enum Tok {
    #[default]
    Alpha,
    Number,
    Mixed,
}

const TOKENS: usize = 4;
const STATES: usize = 16;

fn compile_test_lexer() -> lexpos::CompiledLexer<Tok, TOKENS, STATES> {
    let specs = [
        TokenSpec {
            pattern: r"\w\w*",
            token: Tok::Alpha,
            skip: false,
        },
        TokenSpec {
            pattern: r"\d\d*",
            token: Tok::Number,
            skip: false,
        },
        TokenSpec {
            pattern: r"\w\w*\d\d*",
            token: Tok::Mixed,
            skip: false,
        },
    ];

    compile::<Tok, TOKENS, STATES>(&specs).expect("test lexer should compile")
}

#[test]
fn compile_builds_expected_tokens() {
    let compiled = compile_test_lexer();
    let mut lexer = compiled.lexer();

    assert_match(&mut lexer, "abc", Tok::Alpha, 3);
    assert_match(&mut lexer, "123", Tok::Number, 3);
    assert_match(&mut lexer, "foo123", Tok::Mixed, 6);
    assert!(compiled.dfa().states_len() <= STATES);
}

fn assert_match(
    lexer: &mut lexpos::Lexer<'_, Tok, TOKENS, STATES>,
    input: &str,
    expected_token: Tok,
    expected_len: usize,
) {
    lexer.reset();
    for byte in input.bytes() {
        match lexer.advance(byte) {
            lexpos::Advance::Progress => {}
            other => panic!("unexpected advance state: {:?}", other),
        }
    }
    let result = lexer.finish().expect("finish should succeed");
    let m = result.expect("match expected");
    assert_eq!(m.token, expected_token);
    assert_eq!(m.length, expected_len);
}

#[test]
fn literal_beats_class_on_equal_length() {
    let specs = [
        TokenSpec {
            pattern: r"\w\w*",
            token: Tok::Alpha,
            skip: false,
        },
        TokenSpec {
            pattern: "if",
            token: Tok::Mixed,
            skip: false,
        },
    ];
    let compiled = compile::<Tok, 2, 8>(&specs).expect("lexer should compile");
    assert_eq!(compiled.token(1), Some(Tok::Mixed));

    let mut lexer = compiled.lexer();
    assert_match_id(&mut lexer, "if", 1);
    assert_match_id(&mut lexer, "iffy", 0);
}

fn assert_match_id(lexer: &mut lexpos::Lexer<'_, Tok, 2, 8>, input: &str, token_id: u16) {
    lexer.reset();
    for byte in input.bytes() {
        assert_eq!(lexer.advance(byte), lexpos::Advance::Progress);
    }
    let m = lexer.finish().expect("finish ok").expect("token produced");
    assert_eq!(m.token_id, token_id);
}

#[test]
fn compile_errors_on_too_many_tokens() {
    let specs = [
        TokenSpec {
            pattern: "a",
            token: Tok::Alpha,
            skip: false,
        },
        TokenSpec {
            pattern: "b",
            token: Tok::Number,
            skip: false,
        },
    ];

    match compile::<Tok, 1, 8>(&specs) {
        Err(CompileError::TooManyTokens) => {}
        Err(other) => panic!("unexpected error: {:?}", other),
        Ok(_) => panic!("expected too many tokens error"),
    }
}

#[test]
fn compile_errors_on_state_overflow() {
    let spec = TokenSpec {
        pattern: "abc",
        token: Tok::Alpha,
        skip: false,
    };

    match compile::<Tok, 1, 2>(&[spec]) {
        Err(CompileError::StateOverflow) => {}
        Err(other) => panic!("unexpected error: {:?}", other),
        Ok(_) => panic!("expected state overflow"),
    }
}

#[test]
fn compile_propagates_syntax_errors() {
    let specs = [
        TokenSpec {
            pattern: "a",
            token: Tok::Alpha,
            skip: false,
        },
        TokenSpec {
            pattern: "(b",
            token: Tok::Number,
            skip: false,
        },
    ];

    match compile::<Tok, 2, 8>(&specs) {
        Err(CompileError::Build(lexpos_compiler::CompileError::Syntax { pattern, source })) => {
            assert_eq!(pattern, 1);
            assert_eq!(source.reason, lexpos_compiler::SyntaxErrorKind::UnclosedGroup);
            assert_eq!(source.offset, 0);
        }
        Err(other) => panic!("unexpected error: {:?}", other),
        Ok(_) => panic!("expected syntax error"),
    }
}

#[test]
fn compile_rejects_empty_token_list() {
    let specs: [TokenSpec<'_, Tok>; 0] = [];
    match compile::<Tok, 1, 8>(&specs) {
        Err(CompileError::Build(lexpos_compiler::CompileError::EmptyAutomaton)) => {}
        Err(other) => panic!("unexpected error: {:?}", other),
        Ok(_) => panic!("expected empty automaton error"),
    }
}
