use crate::api::Product;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::effects::{CliNavigator, CliNotifier};
use crate::cli::io;
use crate::cli::output::{line, section as output_section};
use crate::flows::product::IMAGE_FIELD;
use crate::flows::{AddProductForm, Catalog};
use crate::forms::{Effects, View};

use super::{completed, gather_fields, report_upload, select_file, CommandDefinition};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add-product",
            "List a piece of furniture for sale",
            "add-product [title=..] [type=Sofa|Bed|Table|Chair] [description=..] [year=..] [price=..] [image=<path>]",
            cmd_add_product,
        ),
        CommandDefinition::new("products", "Show every listing", "products", cmd_products),
        CommandDefinition::new(
            "my-products",
            "Show your own listings",
            "my-products",
            cmd_my_products,
        ),
        CommandDefinition::new(
            "delete",
            "Delete a listing and its image",
            "delete <product-id>",
            cmd_delete,
        ),
    ]
}

fn cmd_add_product(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.session.require("add a product")?;

    let mut form = AddProductForm::new();
    let fields = form.visible_fields(&context.session);
    let values = gather_fields(context, &fields, args)?;

    let mut notifier = CliNotifier::new(context.mode, &context.theme);
    for (key, value) in values {
        if key == IMAGE_FIELD {
            if value.trim().is_empty() {
                continue;
            }
            if let Some(file) = select_file(&value, &mut notifier) {
                let outcome = form.upload_image(context.transport.as_ref(), file, &mut notifier)?;
                report_upload(&outcome);
            }
            continue;
        }
        form.set_field(&context.session, &key, value)?;
    }

    let mut navigator = CliNavigator::default();
    let outcome = form.submit(
        context.transport.as_ref(),
        &context.session,
        &mut Effects::new(&mut notifier, &mut navigator),
    )?;
    if completed(form.controller().schema(), outcome).is_some() {
        context.follow(navigator.take())?;
    }
    Ok(())
}

fn cmd_products(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    show_products(context)
}

fn cmd_my_products(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    show_my_products(context)
}

pub(crate) fn show_products(context: &ShellContext) -> CommandResult {
    let products = Catalog::new(context.transport.as_ref()).fetch_all()?;
    render_products(context, "Furniture", &products);
    Ok(())
}

pub(crate) fn show_my_products(context: &ShellContext) -> CommandResult {
    let user = context.session.require("see your products")?;
    let products = Catalog::new(context.transport.as_ref()).fetch_owned_by(&user.id)?;
    render_products(context, "My Products", &products);
    Ok(())
}

fn render_products(context: &ShellContext, title: &str, products: &[Product]) {
    output_section(title);
    if products.is_empty() {
        io::print_info("No listings yet.");
        return;
    }
    let config = &context.config;
    for product in products {
        line(format!(
            "  {:<24} {:<6} {:<5} {:<28} [{}]",
            product.title,
            product.kind,
            product.year_label(),
            product.price_label(),
            product.id
        ));
        if !product.description.is_empty() {
            line(format!("      {}", product.description));
        }
        line(format!(
            "      {}",
            product.image_url(&config.image_base_url, &config.placeholder_image_url)
        ));
    }
}

/// Owners delete their own listings; admins may delete any.
fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::InvalidArguments("usage: delete <product-id>".into()));
    };
    let user = context.session.require("delete a product")?;

    let catalog = Catalog::new(context.transport.as_ref());
    let product = catalog
        .fetch_all()?
        .into_iter()
        .find(|product| product.id == *id)
        .ok_or_else(|| CommandError::Message(format!("No listing with id `{}`.", id)))?;
    if !user.is_admin && !product.is_owned_by(&user.id) {
        return Err(CommandError::Message(
            "You can only delete your own listings.".into(),
        ));
    }

    if context.can_prompt()
        && !io::confirm_action(
            &context.theme,
            &format!("Delete `{}`?", product.title),
            false,
        )?
    {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    let mut notifier = CliNotifier::new(context.mode, &context.theme);
    let report = catalog.delete_listing(&product, &mut notifier);
    tracing::debug!(?report, "deletion finished");

    match context.view {
        View::MyProducts => show_my_products(context),
        _ => show_products(context),
    }
}
