//! Catalog commands: `llama list`, `llama add`, `llama edit`, ...
//!
//! Each command mounts a catalog controller against the server, then runs
//! its action through the controller so the same validation and reload
//! rules apply as in any other front end.

use anyhow::Result;
use clap::Args;

use llama_catalog::{CatalogController, CatalogError, FormField, Llama, ValidationError};
use llama_client::ResourceClient;

use super::Output;

type Controller = CatalogController<ResourceClient<Llama>>;

/// Form fields settable from the command line. Values are parsed by the form.
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// Breed label or short name (e.g. "Suri Llama", "suri").
    #[arg(long)]
    pub breed: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub temperament: Option<String>,
    /// Age in years, 0-30. Empty clears it.
    #[arg(long)]
    pub age: Option<String>,
    /// Weight in pounds, 0-500. Empty clears it.
    #[arg(long)]
    pub weight: Option<String>,
    #[arg(long = "image-url")]
    pub image_url: Option<String>,
    #[arg(long = "fun-fact")]
    pub fun_fact: Option<String>,
    /// true/false
    #[arg(long)]
    pub favorite: Option<String>,
}

impl FieldArgs {
    /// Set fields in form order.
    pub fn assignments(&self) -> Vec<(FormField, &str)> {
        [
            (FormField::Name, &self.name),
            (FormField::Breed, &self.breed),
            (FormField::Color, &self.color),
            (FormField::Temperament, &self.temperament),
            (FormField::Age, &self.age),
            (FormField::Weight, &self.weight),
            (FormField::ImageUrl, &self.image_url),
            (FormField::FunFact, &self.fun_fact),
            (FormField::IsFavorite, &self.favorite),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

async fn open(server: &str) -> Result<Controller> {
    let mut ctl = CatalogController::new(ResourceClient::<Llama>::new(server));
    ctl.mount().await.map_err(explain)?;
    if let Some(reason) = &ctl.state().error {
        eprintln!("warning: could not load llamas from {}: {}", server, reason);
    }
    Ok(ctl)
}

fn fill(ctl: &mut Controller, fields: &FieldArgs) -> Result<()> {
    for (field, value) in fields.assignments() {
        ctl.update_field(field, value).map_err(explain)?;
    }
    Ok(())
}

/// Turn missing-field errors into the prompts a form would show.
fn explain(err: CatalogError) -> anyhow::Error {
    match err {
        CatalogError::Validation(ValidationError::MissingFields(fields)) => {
            let prompts: Vec<&str> = fields.iter().filter_map(|f| f.required_message()).collect();
            anyhow::anyhow!("{}", prompts.join("; "))
        }
        other => other.into(),
    }
}

pub async fn list(server: &str, favorites_only: bool, output: Output) -> Result<()> {
    let ctl = open(server).await?;
    let llamas: Vec<&Llama> = if favorites_only {
        ctl.state().favorites().collect()
    } else {
        ctl.state().llamas.iter().collect()
    };

    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(&llamas)?),
        Output::Table if ctl.state().is_empty_view() => println!("No llamas yet"),
        Output::Table => print!("{}", render_table(&llamas)),
    }
    Ok(())
}

pub async fn show(server: &str, id: &str, output: Output) -> Result<()> {
    let ctl = open(server).await?;
    let llama = ctl
        .state()
        .find(id)
        .ok_or_else(|| explain(CatalogError::NotFound(id.to_string())))?;
    print_one(llama, output)
}

pub async fn add(server: &str, fields: &FieldArgs, output: Output) -> Result<()> {
    let mut ctl = open(server).await?;
    ctl.add().map_err(explain)?;
    fill(&mut ctl, fields)?;
    let created = ctl.submit().await.map_err(explain)?;
    print_saved("added", &created, output)
}

pub async fn edit(server: &str, id: &str, fields: &FieldArgs, output: Output) -> Result<()> {
    if fields.assignments().is_empty() {
        anyhow::bail!("Nothing to change. Pass at least one field, e.g. --color brown.");
    }
    let mut ctl = open(server).await?;
    ctl.edit(id).map_err(explain)?;
    fill(&mut ctl, fields)?;
    let updated = ctl.submit().await.map_err(explain)?;
    print_saved("updated", &updated, output)
}

pub async fn favorite(server: &str, id: &str, output: Output) -> Result<()> {
    let mut ctl = open(server).await?;
    let toggled = ctl.toggle_favorite(id).await.map_err(explain)?;
    match output {
        Output::Json => print_one(&toggled, output),
        Output::Table => {
            let verb = if toggled.is_favorite { "is now" } else { "is no longer" };
            println!("{} {} a favorite.", toggled.name, verb);
            Ok(())
        }
    }
}

pub async fn delete(server: &str, id: &str) -> Result<()> {
    let mut ctl = open(server).await?;
    ctl.delete(id).await.map_err(explain)?;
    println!(
        "The server does not support deleting llamas; \"{}\" was kept ({} listed).",
        id,
        ctl.state().llamas.len()
    );
    Ok(())
}

fn print_saved(verb: &str, llama: &Llama, output: Output) -> Result<()> {
    match output {
        Output::Json => print_one(llama, output),
        Output::Table => {
            println!(
                "Llama \"{}\" {} ({}).",
                llama.name,
                verb,
                llama.id.as_deref().unwrap_or("-")
            );
            Ok(())
        }
    }
}

fn print_one(llama: &Llama, output: Output) -> Result<()> {
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(llama)?),
        Output::Table => print!("{}", render_detail(llama)),
    }
    Ok(())
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map_or_else(|| "-".to_string(), T::to_string)
}

fn render_table(llamas: &[&Llama]) -> String {
    let mut out = format!(
        "{:2} {:32} {:16} {:16} {:12} {:>4} {:>6}\n",
        "", "ID", "NAME", "BREED", "COLOR", "AGE", "WEIGHT"
    );
    for l in llamas {
        out.push_str(&format!(
            "{:2} {:32} {:16} {:16} {:12} {:>4} {:>6}\n",
            if l.is_favorite { "*" } else { " " },
            l.id.as_deref().unwrap_or("-"),
            l.name,
            l.breed.label(),
            l.color,
            opt(&l.age),
            opt(&l.weight),
        ));
    }
    out
}

fn render_detail(llama: &Llama) -> String {
    let rows = [
        ("ID", llama.id.clone().unwrap_or_else(|| "-".into())),
        ("Name", llama.name.clone()),
        ("Breed", llama.breed.label().to_string()),
        ("Color", llama.color.clone()),
        ("Temperament", opt(&llama.temperament.map(|t| t.label()))),
        ("Age", opt(&llama.age)),
        ("Weight", opt(&llama.weight)),
        ("Image", opt(&llama.image_url)),
        ("Fun fact", opt(&llama.fun_fact)),
        ("Favorite", if llama.is_favorite { "yes" } else { "no" }.to_string()),
    ];
    rows.iter()
        .map(|(label, value)| format!("{:12} {}\n", format!("{}:", label), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use llama_catalog::{Breed, Temperament};

    fn dolly() -> Llama {
        let mut l = Llama::new("Dolly", Breed::Suri, "white");
        l.id = Some("d1".into());
        l.age = Some(4);
        l.temperament = Some(Temperament::Gentle);
        l.is_favorite = true;
        l
    }

    // ========================================================================
    // Field arguments
    // ========================================================================

    #[test]
    fn assignments_follow_form_order() {
        let args = FieldArgs {
            color: Some("brown".into()),
            name: Some("Kuzco".into()),
            favorite: Some("true".into()),
            ..Default::default()
        };
        assert_eq!(
            args.assignments(),
            vec![
                (FormField::Name, "Kuzco"),
                (FormField::Color, "brown"),
                (FormField::IsFavorite, "true"),
            ]
        );
    }

    #[test]
    fn no_flags_no_assignments() {
        assert!(FieldArgs::default().assignments().is_empty());
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn missing_fields_become_prompts() {
        let err = explain(CatalogError::Validation(ValidationError::MissingFields(vec![
            FormField::Breed,
            FormField::Color,
        ])));
        assert_eq!(err.to_string(), "Please select a breed; Please enter a color");
    }

    #[test]
    fn other_errors_pass_through() {
        let err = explain(CatalogError::NotFound("zz".into()));
        assert_eq!(err.to_string(), "llama 'zz' not found");
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    #[test]
    fn table_marks_favorites() {
        let mut plain = Llama::new("Kuzco", Breed::Classic, "brown");
        plain.id = Some("k1".into());
        let dolly = dolly();
        let table = render_table(&[&dolly, &plain]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("NAME"));
        assert!(lines[1].starts_with('*'));
        assert!(lines[1].contains("Suri Llama"));
        assert!(lines[2].starts_with(' '));
        assert!(lines[2].trim_end().ends_with('-'));
    }

    #[test]
    fn detail_lists_every_field() {
        let detail = render_detail(&dolly());
        assert!(detail.contains("Temperament: Gentle"));
        assert!(detail.contains("Fun fact:    -"));
        assert!(detail.contains("Favorite:    yes"));
        assert_eq!(detail.lines().count(), 10);
    }
}
