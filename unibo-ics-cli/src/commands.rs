use std::fs;

use anyhow::{Context, Result, bail};
use unibo_ics_core::{
    UniboClient,
    courses::sort_courses,
    ics::{IcsGenerator, IcsOptions},
    opendata::Resource,
};

/// Generate command parameters
pub struct GenerateParams {
    pub package: String,
    pub alias: String,
    pub code: u32,
    pub year: u32,
    pub output: Option<String>,
    pub calendar_name: Option<String>,
}

/// List the resources of a catalogue package
pub async fn resources_command(package: String) -> Result<()> {
    let client = UniboClient::new();
    let pack = client.package(&package).await?;
    if !pack.success {
        bail!("catalogue query for package '{package}' was unsuccessful");
    }

    println!("{:<30} {:<20} URL", "ALIAS", "LAST MODIFIED");
    for resource in &pack.result.resources {
        println!(
            "{:<30} {:<20} {}",
            resource.alias,
            resource.last_modified.as_deref().unwrap_or("-"),
            resource.url
        );
    }

    Ok(())
}

/// List the courses published in a package resource
pub async fn courses_command(package: String, alias: String) -> Result<()> {
    let client = UniboClient::new();
    let resource = find_resource(&client, &package, &alias).await?;

    let mut courses = client
        .courses(&resource)
        .await
        .context("failed to download the course table")?;
    sort_courses(&mut courses);

    println!("{:<8} {:<10} {:<6} DESCRIZIONE", "CODICE", "ANNO", "TIPO");
    for course in &courses {
        println!(
            "{:<8} {:<10} {:<6} {}",
            course.codice, course.anno_accademico, course.tipologia, course.descrizione
        );
    }

    Ok(())
}

/// Resolve one course's timetable and write it as an ICS calendar
pub async fn generate_command(params: GenerateParams) -> Result<()> {
    let client = UniboClient::new();
    let resource = find_resource(&client, &params.package, &params.alias).await?;

    let courses = client
        .courses(&resource)
        .await
        .context("failed to download the course table")?;

    let course = courses
        .iter()
        .find(|course| course.codice == params.code)
        .with_context(|| format!("course {} not found in resource '{}'", params.code, params.alias))?;

    tracing::info!(
        "generating calendar for {} ({}), year {}",
        course.descrizione,
        course.codice,
        params.year
    );

    let timetable = client
        .course_timetable(course, params.year)
        .await
        .context("failed to fetch the course timetable")?;

    let generator = IcsGenerator::new(IcsOptions {
        calendar_name: params.calendar_name,
    });
    let calendar = generator.generate(&timetable).to_string();

    match params.output {
        Some(path) => {
            fs::write(&path, calendar)
                .with_context(|| format!("failed to write calendar to {path}"))?;
            println!("Calendar with {} events written to {path}", timetable.len());
        }
        None => print!("{calendar}"),
    }

    Ok(())
}

async fn find_resource(client: &UniboClient, package: &str, alias: &str) -> Result<Resource> {
    let pack = client
        .package(package)
        .await
        .with_context(|| format!("failed to fetch package '{package}'"))?;
    if !pack.success {
        bail!("catalogue query for package '{package}' was unsuccessful");
    }

    pack.result
        .resources
        .get_by_alias(alias)
        .cloned()
        .with_context(|| format!("no resource with alias '{alias}' in package '{package}'"))
}
