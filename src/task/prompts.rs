//! Fixed instruction templates for the framing tasks
//!
//! These texts are passed to the backend unmodified.

/// Hero/villain/victim classification with focus
pub const ACTOR_INSTRUCTION: &str = r#"You are a social scientist specializing in climate change. You will be given a newspaper article and asked who is framed as a hero, villain or a victim in it.
For each of these categories, you will be asked to classify it into the following classes:

GOVERNMENTS_POLITICIANS_POLIT.ORGS: governments, politicians, and political organizations;
INDUSTRY_EMISSIONS: industries, businesses, and the pollution created by them;
LEGISLATION_POLICIES_RESPONSES: policies and legislation responses;
GENERAL_PUBLIC: general public, individuals, and society, including their wellbeing, status quo and economy;
ANIMALS_NATURE_ENVIRONMENT: nature and environment in general or specific species;
ENV.ORGS_ACTIVISTS: climate activists and organizations
SCIENCE_EXPERTS_SCI.REPORTS: scientists and scientific reports/research
CLIMATE_CHANGE: climate change as a process or consequence
GREEN_TECHNOLOGY_INNOVATION: innovative and green technologies
MEDIA_JOURNALISTS: media and journalists



Finally, you need to detect which of the characters (hero, villain, or victim) the news story is focusing on.

Please return a json object which consists of the following fields:

hero_class: a label for the main hero from the list above, or 'NONE' if the main hero cannot be identified.
villain_class: a label for the main villain from the list above, or 'NONE' if the main villain cannot be identified.
victim_class: a label for the main victim from the list above, or 'NONE' if the main victim cannot be identified.
focus: one of the following - HERO, VILLAIN, VICTIM

Do not include anything apart from these fields.
"#;

/// Narrative-action classification
pub const ACTION_INSTRUCTION: &str = r#"You are a social scientist specializing in climate change.
You will be given a newspaper article and asked to identify how it relates to climate crisis.
Assign one of the following classes:

FUEL_RESOLUTION: the article proposes or describes specific measures, policies, or events that would contribute to the resolution of the climate crisis.
FUEL_CONFLICT: the article proposes or describes specific measures, policies, or events that would exacerbate the climate crisis.
PREVENT_RESOLUTION: the article criticises measures, policies, or events that contribute to the resolution of the climate crisis; or it denies the climate crisis.
PREVENT_CONFLICT: the article criticises measures, policies, or events that exacerbate the climate crisis; or it provides the evidence for the climate crisis.

Please return a json object which consists of the following field:

action: one of the following labels: FUEL_RESOLUTION, FUEL_CONFLICT, PREVENT_RESOLUTION, PREVENT_CONFLICT.

Do not include anything apart from these fields."#;

/// Cultural-story classification
pub const STORY_INSTRUCTION: &str = r#"You are a social scientist specializing in climate change.
You will be given a newspaper article and asked what is the cultural story reflected in it.
You should choose one of the following classes:

HIERARCHICAL: this story assumes that the nature can be controlled but we need to be bound by tight social prescriptions.
The cause of climate change is mismanaged society which led to excessive growth, and heroes are impartial scientists or government intervention.

INDIVIDUALISTIC: this story assumes that the nature is resilient and will return to equilibrium.
Villains here are people who try to control climate change or seek policy changes, and the heros allow markets to move naturally as individuals compete to create innovative technologies

EGALITARIAN: this story assumes that the nature is fragile and there is little opportunity to correct mistakes.
The cause of climate change is overconsumption; villains are profit-driven corporations and anyone who supports status quo,
and heros are groups who seek fundamental changes



Please return a json object which consists of the following field:

story: a label from the classes above."#;
