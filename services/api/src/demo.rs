use crate::infra::{InMemoryClipboard, InMemorySubmissionStore, ScriptedPrompt};
use ach_enrollment::admin::{AdminReviewStore, DeleteOutcome, SharedSecret};
use ach_enrollment::config::DEFAULT_PAYEE_NAME;
use ach_enrollment::enrollment::{
    mandate_text, AccountType, EnrollmentField, EnrollmentService, EnrollmentWizard,
    FieldInput, WizardError, WizardStep,
};
use ach_enrollment::error::AppError;
use clap::Args;
use std::sync::Arc;

const DEMO_SECRET: &str = "demo-admin";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Company name entered on the identity step
    #[arg(long, default_value = "Acme Freight LLC")]
    pub(crate) company: String,
    /// Routing number entered on the bank step (separators are stripped)
    #[arg(long, default_value = "021000021")]
    pub(crate) routing_number: String,
    /// Account number entered on the bank step (separators are stripped)
    #[arg(long, default_value = "000123456789")]
    pub(crate) account_number: String,
    /// Enroll a savings account instead of checking
    #[arg(long)]
    pub(crate) savings: bool,
    /// Payee named in the authorization text
    #[arg(long, default_value = DEFAULT_PAYEE_NAME)]
    pub(crate) payee: String,
    /// Confirm the reviewer delete at the end of the demo
    #[arg(long)]
    pub(crate) delete: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemorySubmissionStore::default());
    let service = EnrollmentService::new(store.clone());

    println!("ACH enrollment demo");
    let mut wizard = EnrollmentWizard::new();

    print_step(&wizard);
    fill(&mut wizard, EnrollmentField::CompanyName, args.company.as_str())?;
    fill(&mut wizard, EnrollmentField::ContactName, "Dana Ruiz")?;
    fill(&mut wizard, EnrollmentField::Email, "dana@")?;
    fill(&mut wizard, EnrollmentField::Phone, "515-555-0100")?;
    if let Err(err) = wizard.advance() {
        report_invalid(&wizard, &err);
    }
    fill(&mut wizard, EnrollmentField::Email, "dana@acmefreight.com")?;
    wizard.advance()?;

    print_step(&wizard);
    let account_type = if args.savings {
        AccountType::Savings
    } else {
        AccountType::Checking
    };
    fill(&mut wizard, EnrollmentField::BankName, "First Prairie Bank")?;
    fill(&mut wizard, EnrollmentField::AccountHolderName, args.company.as_str())?;
    fill(&mut wizard, EnrollmentField::AccountType, account_type)?;
    fill(&mut wizard, EnrollmentField::RoutingNumber, args.routing_number.as_str())?;
    fill(&mut wizard, EnrollmentField::AccountNumber, args.account_number.as_str())?;
    fill(
        &mut wizard,
        EnrollmentField::ConfirmAccountNumber,
        args.account_number.as_str(),
    )?;
    if let Err(err) = wizard.advance() {
        report_invalid(&wizard, &err);
        return Err(err.into());
    }

    print_step(&wizard);
    println!("  {}", mandate_text(&args.payee));
    fill(&mut wizard, EnrollmentField::AcceptTerms, true)?;
    fill(&mut wizard, EnrollmentField::SignatureName, "Dana Ruiz")?;

    let receipt = wizard.submit(&service)?.clone();
    println!("\nEnrollment submitted");
    println!("  Company:   {}", receipt.company_name);
    println!("  Bank:      {}", receipt.bank_name);
    println!("  Account:   ****{}", receipt.account_last4);
    println!("  Signed by: {}", receipt.signature_name);

    let clipboard = Arc::new(InMemoryClipboard::default());
    let mut review = AdminReviewStore::new(
        store,
        Arc::new(SharedSecret::new(DEMO_SECRET)),
        clipboard.clone(),
        Arc::new(ScriptedPrompt { answer: args.delete }),
    );

    println!("\nReviewer session");
    if let Err(err) = review.authenticate("not-the-password") {
        println!("  ! {err}");
    }
    review.authenticate(DEMO_SECRET)?;
    let rows = review.rows()?;
    for row in &rows {
        println!(
            "  [{}] {} | {} | {} | {} | {}",
            row.status,
            row.company_name,
            row.contact_name,
            row.bank_name,
            row.account_hint,
            row.submitted_on
        );
    }

    let Some(first) = rows.first() else {
        return Ok(());
    };
    let id = first.id.clone();
    let opened = review.open(&id)?;
    if let Err(err) = &opened.marked {
        println!("  ! {err}");
    }
    let submission = opened.submission;
    println!("\n  Opened {} ({})", submission.id, submission.status_label());
    println!("  Routing: {}", submission.record.routing_number);
    println!("  Account: {}", review.account_display(&id)?);

    if let Err(err) = review.copy_account_number(&id) {
        println!("  ! {err}");
    }
    review.toggle_reveal(&id)?;
    println!("  Account: {}", review.account_display(&id)?);
    review.copy_account_number(&id)?;
    println!(
        "  Copied {}: {}",
        review.copied(),
        clipboard.contents().unwrap_or_default()
    );
    review.close();

    match review.delete(&id)? {
        DeleteOutcome::Deleted => println!("  Submission {id} deleted"),
        DeleteOutcome::Cancelled => println!("  Delete cancelled; {id} kept"),
    }
    println!("  {} submission(s) remain", review.list()?.len());

    Ok(())
}

fn fill(
    wizard: &mut EnrollmentWizard,
    field: EnrollmentField,
    value: impl Into<FieldInput>,
) -> Result<(), WizardError> {
    wizard.update(field, value)
}

fn print_step(wizard: &EnrollmentWizard) {
    let step = wizard.step();
    if step != WizardStep::Submitted {
        println!("\nStep {} of 3: {}", step.number(), step.label());
    }
}

fn report_invalid(wizard: &EnrollmentWizard, err: &WizardError) {
    println!("  ! {err}");
    for (field, message) in wizard.errors().iter() {
        println!("    {}: {message}", field.label());
    }
}
