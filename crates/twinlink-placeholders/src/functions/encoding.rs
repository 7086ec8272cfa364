//! URL and base64 encoding.
//!
//! Decoding input that is not valid for the encoding, or that does not
//! decode to UTF-8, yields an unresolved value.

use super::{expect_no_parameters, PipelineFunction};
use crate::element::PipelineElement;
use crate::error::Result;
use crate::expression::ExpressionResolver;
use crate::signature::FunctionSignature;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

static URL_ENCODE_SIGNATURE: FunctionSignature = FunctionSignature::new("url-encode", &[]);
static URL_DECODE_SIGNATURE: FunctionSignature = FunctionSignature::new("url-decode", &[]);
static BASE64_ENCODE_SIGNATURE: FunctionSignature = FunctionSignature::new("base64-encode", &[]);
static BASE64_DECODE_SIGNATURE: FunctionSignature = FunctionSignature::new("base64-decode", &[]);

/// `fn:url-encode()`
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlEncodeFunction;

impl PipelineFunction for UrlEncodeFunction {
    fn signature(&self) -> &'static FunctionSignature {
        &URL_ENCODE_SIGNATURE
    }

    fn apply(
        &self,
        input: PipelineElement,
        params: &str,
        _resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        expect_no_parameters(&URL_ENCODE_SIGNATURE, params)?;
        Ok(input.map(|value| urlencoding::encode(&value).into_owned()))
    }
}

/// `fn:url-decode()`
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlDecodeFunction;

impl PipelineFunction for UrlDecodeFunction {
    fn signature(&self) -> &'static FunctionSignature {
        &URL_DECODE_SIGNATURE
    }

    fn apply(
        &self,
        input: PipelineElement,
        params: &str,
        _resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        expect_no_parameters(&URL_DECODE_SIGNATURE, params)?;
        Ok(input.and_then(|value| {
            urlencoding::decode(&value)
                .map(|decoded| decoded.into_owned())
                .ok()
                .into()
        }))
    }
}

/// `fn:base64-encode()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64EncodeFunction;

impl PipelineFunction for Base64EncodeFunction {
    fn signature(&self) -> &'static FunctionSignature {
        &BASE64_ENCODE_SIGNATURE
    }

    fn apply(
        &self,
        input: PipelineElement,
        params: &str,
        _resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        expect_no_parameters(&BASE64_ENCODE_SIGNATURE, params)?;
        Ok(input.map(|value| BASE64.encode(value.as_bytes())))
    }
}

/// `fn:base64-decode()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64DecodeFunction;

impl PipelineFunction for Base64DecodeFunction {
    fn signature(&self) -> &'static FunctionSignature {
        &BASE64_DECODE_SIGNATURE
    }

    fn apply(
        &self,
        input: PipelineElement,
        params: &str,
        _resolver: &ExpressionResolver<'_>,
    ) -> Result<PipelineElement> {
        expect_no_parameters(&BASE64_DECODE_SIGNATURE, params)?;
        Ok(input.and_then(|value| {
            BASE64
                .decode(value.as_bytes())
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .into()
        }))
    }
}
