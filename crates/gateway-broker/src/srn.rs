//! Stream resource name construction and parsing.
//!
//! Format: `srn:scp:sns:<region>:<account>:<name>`, unchanged from the
//! original implementation's `makeTopicSrn`/`makeQueueSrn` helpers.

/// Builds an srn for a stream in `region`/`account` named `name`.
pub fn build(region: &str, account: &str, name: &str) -> String {
    format!("srn:scp:sns:{region}:{account}:{name}")
}

/// Extracts the stream name from an srn, taking the last `:`-separated
/// segment — matching the original delete handler, which splits the srn on
/// `:` and uses the final segment as the stream name.
pub fn stream_name(srn: &str) -> &str {
    srn.rsplit(':').next().unwrap_or(srn)
}

/// Like [`stream_name`], but rejects an srn whose final segment is empty
/// (e.g. a trailing `:`), matching the original delete handlers' `name ==
/// ""` check after the split.
pub fn validate_stream_name(srn: &str) -> Result<&str, crate::Error> {
    let name = stream_name(srn);
    if name.is_empty() {
        return Err(crate::Error::InvalidStreamSrn(srn.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_expected_format() {
        assert_eq!(
            build("us-east-1", "acct-1", "orders"),
            "srn:scp:sns:us-east-1:acct-1:orders"
        );
    }

    #[test]
    fn stream_name_takes_last_segment() {
        assert_eq!(
            stream_name("srn:scp:sns:us-east-1:acct-1:orders"),
            "orders"
        );
    }

    #[test]
    fn stream_name_of_bare_name_is_itself() {
        assert_eq!(stream_name("orders"), "orders");
    }

    #[test]
    fn validate_rejects_trailing_colon() {
        let err = validate_stream_name("srn:scp:sns:us-east-1:acct-1:").unwrap_err();
        assert!(matches!(err, crate::Error::InvalidStreamSrn(_)));
    }

    #[test]
    fn validate_accepts_well_formed_srn() {
        assert_eq!(
            validate_stream_name("srn:scp:sns:us-east-1:acct-1:orders").unwrap(),
            "orders"
        );
    }
}
