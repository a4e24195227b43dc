//! Built-in simulated data
//!
//! Substituted for client, product or transcript sources when the
//! `SimulatedData` mode allows it.

use crate::domain::models::{ClientRecord, ProductRecord, Transcript};

const SIMULATED_TRANSCRIPT: &str = r#"
Advisor: Good morning, Ms. Johnson. Thank you for meeting with me today. How have you been?
Client: Good morning. I've been well, thank you. Just busy with work and family as usual.
Advisor: Before we dive in, I'd like to review what we discussed last time: your retirement goals and a college fund for your daughter. Has anything changed since then?
Client: Not really, but I'm concerned that I'm not saving enough for retirement. And I definitely want to set up that college fund soon.
Advisor: Based on your salary of $85,000 and your goal to retire at 65, I recommend increasing your 401(k) contribution from 5% to at least 10%.
Client: I think I could increase to 8% now and then go to 10% next year when I expect a raise.
Advisor: For your daughter's college savings, I recommend a 529 plan with a monthly contribution of $300.
Client: That sounds reasonable. I'm also a bit worried about the market right now. Is this a good time to be investing more?
Advisor: Market timing is difficult even for professionals. I recommend dollar-cost averaging, investing a fixed amount regularly regardless of market conditions.
Client: I see. That makes me feel better about investing regularly.
Advisor: You only have the basic life insurance policy from your employer. As a single parent you should consider term life insurance with coverage of around $500,000.
Client: I've been meaning to look into that. What would you recommend?
Advisor: I'll prepare the paperwork for the 529 plan and the life insurance application today, and I'll schedule a follow-up meeting in three months.
Client: Perfect. When can we get started on implementing these changes?
Advisor: We can begin right away. I'll send you an email with all the details and next steps.
Client: Thank you for your help.
"#;

/// Simulated client table: a single client profile
pub fn clients() -> Vec<ClientRecord> {
    vec![ClientRecord::new("client-1")
        .with_attribute("Name", "Emily Johnson")
        .with_attribute("Age", "38")
        .with_attribute("Marital Status", "Single")
        .with_attribute("# of Children", "1")
        .with_attribute("Occupation", "Marketing Manager")
        .with_attribute("Annual Salary", "85000")
        .with_attribute("Holdings", "Employer 401(k) at 5% contribution; checking account")
        .with_attribute("Risk Profile", "Moderate")]
}

/// Simulated product catalog
pub fn products() -> Vec<ProductRecord> {
    vec![
        ProductRecord::new("prod-pension", "Pension Savings Plan", "retirement").with_attribute(
            "description",
            "Tax-advantaged long-term retirement savings with employer matching and pension payout options",
        ),
        ProductRecord::new("prod-529", "529 Education Savings Plan", "education").with_attribute(
            "description",
            "Tax-free growth for college tuition and other qualified education expenses",
        ),
        ProductRecord::new("prod-term-life", "Term Life Insurance", "insurance").with_attribute(
            "description",
            "Fixed-premium life insurance coverage for 10, 20 or 30 year terms to protect dependents",
        ),
        ProductRecord::new("prod-index-fund", "Balanced Index Fund Portfolio", "investing")
            .with_attribute(
                "description",
                "Diversified low-cost index fund portfolio suited to regular monthly investing and dollar-cost averaging",
            ),
        ProductRecord::new("prod-savings", "High-Yield Savings Account", "savings").with_attribute(
            "description",
            "Liquid savings account for an emergency fund with competitive interest",
        ),
    ]
}

/// Simulated advisor meeting
pub fn transcript() -> Transcript {
    Transcript::parse(SIMULATED_TRANSCRIPT)
}
