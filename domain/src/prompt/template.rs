//! Prompt templates for the content generation flow

/// Templates for each generation step
pub struct GenerationPromptTemplate;

impl GenerationPromptTemplate {
    /// System prompt for the explanation step
    pub fn explanation_system() -> &'static str {
        "You are a physics expert. Provide clear, detailed explanations of physics concepts \
with formulas and real-world applications. Format formulas in LaTeX notation."
    }

    /// User prompt for the explanation step
    pub fn explanation_prompt(topic: &str) -> String {
        format!(
            "Explain the physics concept: {}. Include key formulas, principles, and practical applications.",
            topic
        )
    }

    /// System prompt for the animation code step
    pub fn animation_system() -> &'static str {
        "You are a Manim animation expert. Generate Python code using Manim library to visualize physics concepts."
    }

    /// User prompt for the animation code step
    pub fn animation_prompt(topic: &str) -> String {
        format!(
            "Generate Manim Python code to visualize: {}. Include comments explaining each part.",
            topic
        )
    }

    /// Image prompt for the diagram step
    pub fn diagram_prompt(topic: &str) -> String {
        format!(
            "Technical physics diagram illustrating {}. Include labels, arrows, and clear visual \
representation. Style: educational textbook diagram with clean lines and annotations.",
            topic
        )
    }

    /// System prompt for the solution step
    pub fn solution_system() -> &'static str {
        "You are an expert physics tutor. Provide detailed step-by-step solutions to physics \
problems with clear explanations, formulas, and reasoning."
    }

    /// User prompt for the solution step
    pub fn solution_prompt(problem: &str) -> String {
        format!(
            "Solve this physics problem and provide a detailed step-by-step solution:\n\n{}",
            problem
        )
    }

    /// Image prompt for a problem diagram; `excerpt` is the start of the problem
    pub fn problem_diagram_prompt(excerpt: &str) -> String {
        format!(
            "Create a physics diagram for this problem: {}. Include all relevant forces, vectors, and measurements.",
            excerpt
        )
    }

    /// System prompt for hints
    pub fn hints_system() -> &'static str {
        "You are a helpful physics tutor. Provide 3-4 helpful hints to guide students towards \
solving the problem without giving away the answer."
    }

    /// User prompt for hints
    pub fn hints_prompt(problem: &str) -> String {
        format!("Provide hints for solving this physics problem:\n\n{}", problem)
    }
}
