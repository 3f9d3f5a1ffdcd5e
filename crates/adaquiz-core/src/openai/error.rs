use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error(transparent)]
    Api(#[from] async_openai::error::OpenAIError),

    #[error(transparent)]
    FunctionCall(#[from] FunctionCallError),

    #[error("No response from the language model")]
    EmptyResponse,

    #[error(transparent)]
    HttpClientBuild(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum FunctionCallError {
    #[error("The language model returned the wrong function")]
    WrongFunction,

    #[error("Syntax returned by the language model is invalid")]
    InvalidSyntax,

    #[error("No function call in the response even though one was expected")]
    Missing,
}
