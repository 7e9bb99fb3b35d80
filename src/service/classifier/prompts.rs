//! Prompts for escalated applicability analysis

use super::ClassificationContext;

/// System prompt for applicability escalation
pub const ESCALATION_SYSTEM_PROMPT: &str = r#"You are an aviation maintenance records analyst. Your task is to decide whether a specific aircraft falls under the applicability of an FAA Airworthiness Directive (AD), using only the directive text provided.

## Rules

1. Base the decision strictly on the directive text. Do not rely on outside knowledge of the directive.
2. Serial number ranges are inclusive. Compare serial numbers numerically when both are numeric.
3. A directive that names the aircraft model without serial limits applies to every serial number of that model.
4. Exclusions ("except", "does not apply to", "not affected") override a general model match.
5. If the text does not allow a decision, return applicable = false with a low confidence.

## Confidence

- 90-100: the text names the serial number or an inclusive range containing it
- 70-89: the text names the model or series without serial limits
- 40-69: the text is indirect (type certificate, component installed) but points one way
- 0-39: the text does not support a decision

## Output Requirements

- applicable: true or false
- confidence: integer from 0 to 100
- reasoning: one or two factual sentences quoting the serial range, model, or exclusion that drove the decision
"#;

/// Build the escalation prompt for one aircraft and directive
pub fn build_escalation_prompt(ctx: &ClassificationContext<'_>) -> String {
    format!(
        r#"Determine whether Airworthiness Directive {} applies to this aircraft.

## Aircraft
- Model: {}
- Serial Number: {}

## Directive Applicability Text

{}

---

Return structured JSON with applicable, confidence, and reasoning."#,
        ctx.ad_number, ctx.model, ctx.serial_number, ctx.text
    )
}
