//! Customer command handlers.

use tabled::Tabled;

use coachdesk_core::{Console, Customer, CustomerDraft, CustomerOption, CustomerPatch, Row, RowId};

use crate::cli::{CustomerFields, CustomersArgs, CustomersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Street")]
    street: String,
    #[tabled(rename = "Postcode")]
    postcode: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&Row<Customer>> for CustomerRow {
    fn from(row: &Row<Customer>) -> Self {
        let c = &row.item;
        Self {
            name: c.full_name(),
            street: c.streetaddress.clone(),
            postcode: c.postcode.clone(),
            city: c.city.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            id: row.id.to_string(),
        }
    }
}

#[derive(Tabled)]
struct OptionRow {
    #[tabled(rename = "Customer")]
    label: String,
    #[tabled(rename = "Link")]
    href: String,
}

fn detail(c: &Customer) -> String {
    output::detail_lines(&[
        ("Name", c.full_name()),
        ("Street", c.streetaddress.clone()),
        ("Postcode", c.postcode.clone()),
        ("City", c.city.clone()),
        ("Email", c.email.clone()),
        ("Phone", c.phone.clone()),
        ("Link", c.links.self_href().unwrap_or_default().to_owned()),
    ])
}

fn patch(fields: CustomerFields) -> CustomerPatch {
    CustomerPatch {
        firstname: fields.firstname,
        lastname: fields.lastname,
        streetaddress: fields.street,
        postcode: fields.postcode,
        city: fields.city,
        email: fields.email,
        phone: fields.phone,
    }
}

fn draft(fields: CustomerFields) -> CustomerDraft {
    let mut draft = CustomerDraft::default();
    patch(fields).apply(&mut draft);
    draft
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: CustomersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CustomersCommand::List => {
            let rows =
                util::with_spinner(global, "Loading customers", console.customers().refresh())
                    .await?;
            let out = output::render_list(
                &global.output,
                rows.as_slice(),
                |r| CustomerRow::from(r),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Get { id } => {
            let customer = console
                .gateway()
                .customer(&id)
                .await
                .map_err(|e| CliError::for_record(e, "customer", &id))?;
            let out = output::render_single(&global.output, &customer, detail, |c| {
                c.links.self_href().unwrap_or_default().to_owned()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Add(fields) => {
            let draft = draft(fields);
            let name = format!("{} {}", draft.firstname, draft.lastname);
            util::with_spinner(global, "Saving customer", console.add_customer(&draft)).await?;
            output::print_success(&format!("Customer {name} added"), &global.color, global.quiet);
            Ok(())
        }

        CustomersCommand::Edit { id, fields } => {
            let patch = patch(fields);
            if patch.is_empty() {
                return Err(CliError::Validation {
                    field: "customer".into(),
                    reason: "nothing to change; pass at least one field flag".into(),
                });
            }
            let row_id = RowId::Href(id.clone());
            util::with_spinner(global, "Saving customer", console.edit_customer(&row_id, patch))
                .await
                .map_err(|e| CliError::for_record(e, "customer", &id))?;
            output::print_success("Customer updated", &global.color, global.quiet);
            Ok(())
        }

        CustomersCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete customer {id}?"),
                "customers delete",
                global,
            )? {
                return Ok(());
            }
            let row_id = RowId::Href(id.clone());
            util::with_spinner(global, "Deleting customer", console.remove_customer(&row_id))
                .await
                .map_err(|e| CliError::for_record(e, "customer", &id))?;
            output::print_success("Customer deleted", &global.color, global.quiet);
            Ok(())
        }

        CustomersCommand::Options => {
            let options =
                util::with_spinner(global, "Loading customers", console.customer_options())
                    .await?;
            let out = output::render_list(
                &global.output,
                &options,
                |o: &CustomerOption| OptionRow {
                    label: o.label.clone(),
                    href: o.href.clone(),
                },
                |o| format!("{}\t{}", o.label, o.href),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
