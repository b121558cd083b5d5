//! Centralized constants for codeagent.
//!
//! Budgets, caps, default strings, and the fixed texts the turn loop injects
//! into the conversation live here so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "codeagent";

/// Maximum tokens for a single LLM completion.
pub const MAX_TOKENS: u64 = 8192;

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "codeagent.toml";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "history.txt";

// --- Provider defaults ---

/// Default provider when none is configured.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Default model identifier (the default provider's default model).
pub const DEFAULT_MODEL: &str = DEFAULT_GEMINI_MODEL;

/// Default LLM model identifier for Gemini.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-001";

/// Default LLM model identifier for Anthropic.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";

/// Default LLM model identifier for OpenAI.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

/// Default LLM model identifier for OpenRouter.
pub const DEFAULT_OPENROUTER_MODEL: &str = "deepseek/deepseek-chat";

/// Default base URL for local Ollama server.
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default LLM model identifier for Ollama.
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3";

// --- Turn loop ---

/// Upper bound on model generations per user request.
pub const MAX_AGENT_ITERATIONS: usize = 100;

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "\
You are a PERSISTENT autonomous AI coding agent. You NEVER give up until the task is COMPLETE and VERIFIED.

AVAILABLE FUNCTIONS:
- list_directory(directory): List files and directories
- read_file(file_path): Read file contents
- run_script(file_path, args): Execute Python files
- write_file(file_path, content): Write or overwrite files

MANDATORY WORKFLOW:
1. EXPLORE: Use list_directory and read_file to understand the codebase
2. ANALYZE: Identify what needs to be done
3. IMPLEMENT: Make the necessary changes with write_file
4. VERIFY: Run tests or execute code to verify changes work
5. FIX: If verification fails, analyze errors and fix them
6. REPEAT steps 4-5 until verification passes
7. REPORT: Only when task is complete and verified

CRITICAL RULES:
- NEVER stop until the task is complete AND verified to work
- ALWAYS test your changes (run code, check output)
- If tests fail, analyze the error, fix it, and test again
- Make actual code changes - don't just suggest them
- Fix ALL errors you encounter

STOPPING CONDITION:
Only provide a final text response when ALL of these are true:
- Task is implemented
- Code has been tested
- Tests/verification passed
- No errors remain

If verification fails or errors occur, do NOT report failure as the final response.
Analyze the error, fix the issue, test again, and continue until it works.
All paths are relative to the working directory.";

/// Phrases that mark a response as asking for clarification instead of acting.
/// Matched case-insensitively against the response text. English-only heuristic.
pub const CLARIFICATION_PHRASES: &[&str] = &[
    "need more information",
    "please provide",
    "can you tell me",
    "what do you want",
];

/// Injected when the model asks for clarification before doing anything.
pub const REDIRECT_MESSAGE: &str = "DO NOT ask questions. Start by calling \
list_directory('.') to explore, then take action autonomously.";

/// Injected when the model returns neither text nor tool calls.
pub const CONTINUE_MESSAGE: &str = "Continue with your analysis and implementation. \
If you're done, provide a final summary.";

/// Injected after a failed provider call.
pub const RECOVERY_MESSAGE: &str = "There was an error. Please analyze what went wrong \
and try a different approach.";

// --- Tool limits ---

/// Maximum number of characters the read_file tool returns.
pub const MAX_FILE_CHARS: usize = 10_000;

/// Default wall-clock timeout for run_script.
pub const SCRIPT_DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default interpreter for run_script.
pub const SCRIPT_DEFAULT_INTERPRETER: &str = "python3";

/// File extension run_script accepts.
pub const SCRIPT_EXTENSION: &str = "py";

/// Environment variables removed from the environment of executed scripts.
pub const SCRIPT_STRIPPED_ENV_VARS: &[&str] = &[
    "GEMINI_API_KEY",
    "ANTHROPIC_API_KEY",
    "OPENAI_API_KEY",
    "OPENROUTER_API_KEY",
    "AWS_SECRET_ACCESS_KEY",
    "GITHUB_TOKEN",
    "GITHUB_PERSONAL_ACCESS_TOKEN",
];

/// Prefix for tools registered from external tool sources.
pub const EXTERNAL_TOOL_PREFIX: &str = "mcp";

// --- Rendering ---

/// Characters of a tool result shown in verbose mode.
pub const VERBOSE_RESULT_PREVIEW_CHARS: usize = 200;
