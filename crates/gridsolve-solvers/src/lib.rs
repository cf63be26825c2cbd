//! # Gridsolve Solvers
//!
//! SolverGateway implementations. The gateway couples a generative client
//! (Gemini or any OpenAI-compatible endpoint) with the fixed instruction
//! contract that tells the model how to validate, solve, and grid-format
//! an equation.

mod client;
mod factory;
mod gateway;
mod gemini;
mod instructions;

pub use client::{
    GenerateRequest, GenerativeClient, MockGenerativeClient, OpenAiClient, OpenAiClientConfig,
};
pub use factory::{build_gateway, BuildError};
pub use gateway::{LlmSolverGateway, SolverRequestConfig};
pub use gemini::{GeminiClient, GeminiClientConfig};
pub use instructions::SOLVER_INSTRUCTIONS;
