//! Result type alias for Glucotel
//!
//! This module provides a convenient Result type alias that uses
//! GlucotelError as the error type.

use super::errors::GlucotelError;

/// Result type alias for Glucotel operations
///
/// This is a convenience type alias that uses `GlucotelError` as the error
/// type. Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use glucotel::domain::result::Result;
/// use glucotel::domain::errors::GlucotelError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(GlucotelError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, GlucotelError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::GlucotelError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(GlucotelError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
