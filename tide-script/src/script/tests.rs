use color_eyre::eyre::Result;
use proptest::prelude::*;

use tide_chain::{primitives::blake2b_256, serialization::SerializationError};

use crate::{
    context::CompilerContext,
    error::{CompileError, ScriptError, TypeError},
    expr::{Expr, TypedExpr},
    type_check::{type_check, type_check_script},
    types::Type,
};

use super::*;

fn checked(expr: &Expr) -> TypedExpr {
    type_check(CompilerContext::v1(), expr).expect("test expression type checks")
}

/// `sigVerify(txBodyBytes, base16'00..00', txSenderPk)`, which costs exactly
/// one signature check.
fn sig_verify() -> Expr {
    Expr::call(
        "sigVerify",
        vec![
            Expr::var("txBodyBytes"),
            Expr::ConstBytes(vec![0; 8]),
            Expr::var("txSenderPk"),
        ],
    )
}

fn all_of(count: usize) -> Expr {
    (1..count).fold(sig_verify(), |acc, _| Expr::and(acc, sig_verify()))
}

#[test]
fn compile_true() -> Result<()> {
    let _init_guard = tide_test::init();

    let script = Script::compile(TypedExpr::True, true)?;

    assert_eq!(script.version(), V1);
    assert_eq!(script.complexity(), 0);
    assert_eq!(script.bytes(), hex::decode("01066a955149")?.as_slice());

    let Script::V1(v1) = &script;
    assert_eq!(v1.checksum(), [0x6a, 0x95, 0x51, 0x49]);

    Ok(())
}

#[test]
fn compile_height_vector() -> Result<()> {
    let _init_guard = tide_test::init();

    let expr = checked(&Expr::call(
        ">=",
        vec![Expr::var("height"), Expr::ConstLong(100)],
    ));
    let script = Script::compile(expr, true)?;

    let mut expected = vec![V1];
    expected.extend_from_slice(&tide_test::vectors::EXPR_HEIGHT_AT_LEAST_100);
    expected.extend_from_slice(&hex::decode("143cc079")?);
    assert_eq!(script.bytes(), expected.as_slice());
    assert_eq!(script.complexity(), 1);

    Ok(())
}

#[test]
fn checksum_covers_version_and_expression() -> Result<()> {
    let _init_guard = tide_test::init();

    let script = Script::compile(checked(&all_of(3)), true)?;
    let bytes = script.bytes();
    let (canonical, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LENGTH);

    assert_eq!(canonical[0], V1);
    assert_eq!(&blake2b_256(canonical)[..CHECKSUM_LENGTH], checksum);

    Ok(())
}

#[test]
fn non_boolean_expression_is_rejected() {
    let _init_guard = tide_test::init();

    let expr = checked(&Expr::ConstLong(1));
    assert_eq!(
        Script::compile(expr, true),
        Err(CompileError::NotBoolean { actual: Type::Long })
    );
}

#[test]
fn twenty_signatures_fit() -> Result<()> {
    let _init_guard = tide_test::init();

    let script = Script::compile(checked(&all_of(20)), true)?;
    assert_eq!(script.complexity(), ScriptLimits::MAX_COMPLEXITY);

    Ok(())
}

#[test]
fn twenty_one_signatures_are_too_complex() {
    let _init_guard = tide_test::init();

    let expr = checked(&all_of(21));
    assert_eq!(
        Script::compile(expr.clone(), true),
        Err(CompileError::TooComplex {
            score: 2100,
            limit: 2000
        })
    );

    // Complexity is checked whether or not size is.
    assert!(matches!(
        Script::compile(expr, false),
        Err(CompileError::TooComplex { .. })
    ));
}

#[test]
fn large_constant_is_too_large() -> Result<()> {
    let _init_guard = tide_test::init();

    let expr = checked(&Expr::call(
        "==",
        vec![Expr::ConstBytes(vec![7; 2100]), Expr::var("txId")],
    ));

    match Script::compile(expr.clone(), true) {
        Err(CompileError::TooLarge { actual, limit }) => {
            assert!(actual > 2100);
            assert_eq!(limit, ScriptLimits::MAX_SIZE);
        }
        other => panic!("expected TooLarge, got {other:?}"),
    }

    // Without the size check the same script compiles.
    let script = Script::compile(expr, false)?;
    assert!(script.bytes().len() > ScriptLimits::MAX_SIZE);

    Ok(())
}

#[test]
fn complexity_is_checked_before_size() {
    let _init_guard = tide_test::init();

    let limits = ScriptLimits {
        max_complexity: 0,
        max_size: 1,
    };
    let expr = checked(&sig_verify());

    assert!(matches!(
        Script::compile_with_limits(expr, &limits, true),
        Err(CompileError::TooComplex { .. })
    ));
}

#[test]
fn bytes_are_stable() -> Result<()> {
    let _init_guard = tide_test::init();

    let script = Script::compile(checked(&all_of(5)), true)?;
    let first = script.bytes().to_vec();

    for _ in 0..3 {
        assert_eq!(script.bytes(), first.as_slice());
    }
    assert_eq!(script.clone().bytes(), first.as_slice());

    Ok(())
}

#[test]
fn from_bytes_round_trip() -> Result<()> {
    let _init_guard = tide_test::init();

    let script = Script::compile(checked(&all_of(4)), true)?;
    let parsed = Script::from_bytes(
        script.bytes(),
        CompilerContext::v1(),
        &ScriptLimits::default(),
    )?;

    assert_eq!(parsed, script);
    assert_eq!(parsed.complexity(), script.complexity());

    Ok(())
}

#[test]
fn from_bytes_rejects_bad_artifacts() -> Result<()> {
    let _init_guard = tide_test::init();

    let limits = ScriptLimits::default();
    let ctx = CompilerContext::v1();

    assert_eq!(Script::from_bytes(&[], ctx, &limits), Err(ScriptError::Empty));
    assert_eq!(
        Script::from_bytes(&[2, 6, 0, 0, 0, 0], ctx, &limits),
        Err(ScriptError::UnknownVersion(2))
    );
    assert_eq!(
        Script::from_bytes(&[1, 6, 0x6a, 0x95, 0x51, 0x48], ctx, &limits),
        Err(ScriptError::InvalidChecksum)
    );
    assert!(matches!(
        Script::from_bytes(&[1, 6], ctx, &limits),
        Err(ScriptError::Serialization(SerializationError::Parse(_)))
    ));

    // A well-formed artifact whose expression isn't Boolean.
    let mut bytes = vec![V1, 0];
    bytes.extend_from_slice(&42i64.to_be_bytes());
    let checksum = blake2b_256(&bytes);
    bytes.extend_from_slice(&checksum[..CHECKSUM_LENGTH]);
    assert_eq!(
        Script::from_bytes(&bytes, ctx, &limits),
        Err(ScriptError::Type(TypeError::NonBooleanRoot {
            actual: Type::Long
        }))
    );

    // Environment values don't resolve in the pure context.
    let height = Script::compile(
        checked(&Expr::call(">=", vec![Expr::var("height"), Expr::ConstLong(100)])),
        true,
    )?;
    assert!(matches!(
        Script::from_bytes(height.bytes(), &CompilerContext::pure(), &limits),
        Err(ScriptError::Type(TypeError::UndefinedSymbol { .. }))
    ));

    Ok(())
}

#[test]
fn from_bytes_enforces_limits() -> Result<()> {
    let _init_guard = tide_test::init();

    let script = Script::compile(checked(&all_of(5)), true)?;

    let small = ScriptLimits {
        max_complexity: ScriptLimits::MAX_COMPLEXITY,
        max_size: script.bytes().len() - 1,
    };
    assert!(matches!(
        Script::from_bytes(script.bytes(), CompilerContext::v1(), &small),
        Err(ScriptError::Compile(CompileError::TooLarge { .. }))
    ));

    let simple = ScriptLimits {
        max_complexity: 100,
        max_size: ScriptLimits::MAX_SIZE,
    };
    assert!(matches!(
        Script::from_bytes(script.bytes(), CompilerContext::v1(), &simple),
        Err(ScriptError::Compile(CompileError::TooComplex { .. }))
    ));

    Ok(())
}

/// `if true then (if true then ... true ... else false) else false`, with
/// `levels` nested `if`s around the innermost `true`.
fn nested_ifs(levels: usize) -> Expr {
    (0..levels).fold(Expr::True, |inner, _| {
        Expr::if_then_else(Expr::True, inner, Expr::False)
    })
}

#[test]
fn nesting_depth_matches_decoding() -> Result<()> {
    let _init_guard = tide_test::init();

    let limits = ScriptLimits::default();
    let ctx = CompilerContext::v1();

    // The deepest accepted script parses back from its own bytes.
    let deepest = Script::compile(checked(&nested_ifs(MAX_EXPR_DEPTH - 1)), true)?;
    assert_eq!(deepest.complexity(), 0);
    assert_eq!(Script::from_bytes(deepest.bytes(), ctx, &limits)?, deepest);

    // One level deeper is rejected by both.
    assert_eq!(
        Script::compile(checked(&nested_ifs(MAX_EXPR_DEPTH)), true),
        Err(CompileError::TooDeep {
            depth: MAX_EXPR_DEPTH + 1,
            limit: MAX_EXPR_DEPTH,
        })
    );

    let mut bytes = vec![V1];
    for _ in 0..MAX_EXPR_DEPTH {
        bytes.extend_from_slice(&[3, 6]);
    }
    bytes.push(6);
    bytes.extend(std::iter::repeat(7).take(MAX_EXPR_DEPTH));
    let checksum = blake2b_256(&bytes);
    bytes.extend_from_slice(&checksum[..CHECKSUM_LENGTH]);
    assert!(bytes.len() <= limits.max_size);
    assert!(matches!(
        Script::from_bytes(&bytes, ctx, &limits),
        Err(ScriptError::Serialization(SerializationError::Parse(_)))
    ));

    Ok(())
}

proptest! {
    /// Compiling the same expression twice gives identical bytes.
    #[test]
    fn compile_is_deterministic(count in 1usize..20, height in any::<i64>()) {
        let _init_guard = tide_test::init();

        let expr = Expr::and(
            all_of(count),
            Expr::call(">", vec![Expr::var("height"), Expr::ConstLong(height)]),
        );
        let typed = type_check_script(CompilerContext::v1(), &expr)?;

        let first = Script::compile(typed.clone(), true)?;
        let second = Script::compile(typed, true)?;
        prop_assert_eq!(first.bytes(), second.bytes());
        prop_assert_eq!(first.complexity(), count as u64 * 100 + 1);
    }
}
