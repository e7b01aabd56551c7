//! Starter family used when a record store has never been saved

use crate::models::{Gender, PersonId, PersonRecord};

/// Three generations: grandparents, a father married to a mother from outside
/// the bloodline, an uncle, and two grandchildren.
pub fn sample_family() -> Vec<PersonRecord> {
    vec![
        PersonRecord::new(PersonId(1), "Grandfather")
            .with_partner(PersonId(2))
            .with_notes("The patriarch of the family.")
            .with_birth_date("1940-01-01")
            .with_gender(Gender::Male),
        PersonRecord::new(PersonId(2), "Grandmother")
            .with_partner(PersonId(1))
            .with_notes("The matriarch of the family.")
            .with_birth_date("1942-05-15")
            .with_gender(Gender::Female),
        PersonRecord::new(PersonId(3), "Father")
            .with_parent(PersonId(1))
            .with_partner(PersonId(7))
            .with_notes("")
            .with_birth_date("1965-08-20")
            .with_gender(Gender::Male),
        PersonRecord::new(PersonId(4), "Uncle")
            .with_parent(PersonId(1))
            .with_notes("")
            .with_birth_date("1968-11-10")
            .with_gender(Gender::Male),
        PersonRecord::new(PersonId(5), "Me")
            .with_parent(PersonId(3))
            .with_notes("This is me!")
            .with_birth_date("1995-03-15")
            .with_gender(Gender::Male),
        PersonRecord::new(PersonId(6), "Sister")
            .with_parent(PersonId(3))
            .with_notes("")
            .with_birth_date("1998-07-22")
            .with_gender(Gender::Female),
        PersonRecord::new(PersonId(7), "Mother")
            .with_partner(PersonId(3))
            .with_notes("Mom")
            .with_birth_date("1967-04-10")
            .with_gender(Gender::Female),
    ]
}
