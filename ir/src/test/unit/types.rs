use test_case::test_case;

use crate::types::Value;

#[test_case(Value::Integer(6), Value::Integer(3), Value::Integer(2) ; "exact stays integral")]
#[test_case(Value::Integer(7), Value::Integer(2), Value::Real(3.5) ; "inexact goes real")]
#[test_case(Value::Integer(1), Value::Integer(0), Value::Undefined ; "by zero")]
#[test_case(Value::Integer(i64::MIN), Value::Integer(-1), Value::Real(-(i64::MIN as f64)) ; "min over minus one")]
#[test_case(Value::Integer(i64::MIN), Value::Integer(1), Value::Integer(i64::MIN) ; "min over one")]
fn test_divide(lhs: Value, rhs: Value, expected: Value) {
    assert_eq!(lhs.divide(&rhs), expected);
}

#[test_case(0, Value::Integer(1))]
#[test_case(20, Value::Integer(2_432_902_008_176_640_000))]
#[test_case(-3, Value::Undefined ; "negative")]
fn test_factorial(n: i64, expected: Value) {
    assert_eq!(Value::Integer(n).factorial(), expected);
}

#[test]
fn test_factorial_past_i64_goes_real() {
    let Value::Real(v) = Value::Integer(21).factorial() else { panic!("expected a real") };
    assert!((v - 5.109_094_217_170_944e19).abs() / v < 1e-12);
    assert_eq!(Value::Integer(171).factorial(), Value::Real(f64::INFINITY));
}

#[test]
fn test_factorial_of_huge_input_is_immediate() {
    assert_eq!(Value::Integer(20_000_000_000).factorial(), Value::Real(f64::INFINITY));
    assert_eq!(Value::Integer(i64::MAX).factorial(), Value::Real(f64::INFINITY));
}
