use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::QuizQuestionAdded;

#[derive(Accounts)]
pub struct AddQuizQuestion<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [b"quiz", quiz.quiz_id.to_le_bytes().as_ref()],
        bump = quiz.bump,
        has_one = creator @ StakePoolError::Unauthorized,
    )]
    pub quiz: Account<'info, Quiz>,

    #[account(
        init,
        payer = creator,
        space = QuizQuestion::SIZE,
        seeds = [b"question", quiz.key().as_ref(), quiz.questions_added.to_le_bytes().as_ref()],
        bump,
    )]
    pub question: Account<'info, QuizQuestion>,

    pub system_program: Program<'info, System>,
}

/// Appends the next question. Only a commitment to the answer is stored;
/// grading happens off-chain.
pub fn handler(
    ctx: Context<AddQuizQuestion>,
    prompt: String,
    options: Vec<String>,
    answer_commitment: [u8; 32],
) -> Result<()> {
    let quiz = &ctx.accounts.quiz;
    require!(quiz.status == QuizStatus::Draft, StakePoolError::QuizNotDraft);
    require!(
        quiz.questions_added < quiz.total_questions,
        StakePoolError::QuestionCountOutOfRange
    );
    require!(
        !prompt.is_empty() && prompt.len() <= QuizQuestion::MAX_PROMPT_LEN,
        StakePoolError::InvalidPrompt
    );
    require!(
        options.len() >= QuizQuestion::MIN_OPTIONS
            && options.len() <= QuizQuestion::MAX_OPTIONS
            && options
                .iter()
                .all(|o| !o.is_empty() && o.len() <= QuizQuestion::MAX_OPTION_LEN),
        StakePoolError::InvalidOptions
    );

    let index = quiz.questions_added;
    let quiz_key = quiz.key();

    let question = &mut ctx.accounts.question;
    question.quiz = quiz_key;
    question.index = index;
    question.prompt = prompt;
    question.options = options;
    question.answer_commitment = answer_commitment;
    question.bump = ctx.bumps.question;

    ctx.accounts.quiz.questions_added = index + 1;

    emit!(QuizQuestionAdded {
        quiz: quiz_key,
        index,
    });

    Ok(())
}
