use crate::currency::CurrencyFormat;
use crate::form::{FormField, FormState};

const LABEL_WIDTH: usize = 28;

/// The price headline, as shown above the form.
pub fn render_price(form: &FormState, format: &CurrencyFormat) -> String {
    format!("Estimated price: {}\n", format.format_price(form.price()))
}

/// The whole form: price headline, then one line per field.
pub fn render_form(form: &FormState, format: &CurrencyFormat) -> String {
    let mut output = render_price(form, format);
    output.push('\n');
    for field in FormField::ALL {
        output.push_str(&format!(
            "  {:<width$}{}\n",
            field.label(),
            form.value_text(field),
            width = LABEL_WIDTH
        ));
    }
    output
}
