use crate::CoreError;

/// Floating point type used for parameters and raw solver output.
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and `>= 0`.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(CoreError::Negative { what, value: v });
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn non_negative_allows_zero() {
        assert_eq!(ensure_non_negative(0.0, "speed"), Ok(0.0));
        assert!(matches!(
            ensure_non_negative(-0.1, "speed"),
            Err(CoreError::Negative { .. })
        ));
        assert!(ensure_non_negative(Real::INFINITY, "speed").is_err());
    }
}
