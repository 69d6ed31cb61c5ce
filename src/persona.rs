//! Personas for the front desk
//!
//! A persona is a named system prompt plus the canned texts used when the
//! model is unavailable. Two are defined: Ângela (front desk) answers every
//! first contact, Raquel (sales) takes over once a sales interest is
//! detected.

use chrono::{Local, Timelike};

/// Persona identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaId {
    /// Ângela, the virtual receptionist
    FrontDesk,
    /// Raquel, the sales department
    Sales,
}

impl PersonaId {
    /// Stable string form, used in logs and task descriptions
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FrontDesk => "front_desk",
            Self::Sales => "sales",
        }
    }
}

/// A persona definition
#[derive(Debug, Clone)]
pub struct Persona {
    pub id: PersonaId,
    /// Display name
    pub name: &'static str,
    /// System prompt used when composing model requests
    pub system_prompt: &'static str,
}

impl Persona {
    /// The front desk persona (Ângela)
    #[must_use]
    pub const fn front_desk() -> Self {
        Self {
            id: PersonaId::FrontDesk,
            name: "Ângela",
            system_prompt: "Você é a Ângela, recepcionista virtual da SUNLUX Energia, \
                uma empresa de energia solar. Seja cordial e objetiva. Registre a \
                solicitação do cliente e informe que o setor responsável retornará em \
                breve. Nunca invente preços ou prazos.",
        }
    }

    /// The sales persona (Raquel)
    #[must_use]
    pub const fn sales() -> Self {
        Self {
            id: PersonaId::Sales,
            name: "Raquel",
            system_prompt: "Você é a Raquel, do setor comercial da SUNLUX Energia. \
                O cliente demonstrou interesse em orçamento de energia solar. Entenda \
                a necessidade dele e explique os próximos passos para uma proposta \
                fotovoltaica. Nunca invente preços ou prazos.",
        }
    }

    /// Look up a persona by id
    #[must_use]
    pub const fn get(id: PersonaId) -> Self {
        match id {
            PersonaId::FrontDesk => Self::front_desk(),
            PersonaId::Sales => Self::sales(),
        }
    }
}

/// Fixed front-desk reply used whenever the model is unavailable
#[must_use]
pub fn fallback_greeting() -> String {
    format!(
        "{} 😊\n\n\
         Sou a Ângela, recepcionista virtual da SUNLUX Energia.\n\n\
         Recebi sua mensagem e vou registrá-la em nosso sistema e encaminhar \
         ao setor responsável.\n\n\
         Em breve retornaremos.",
        greeting_for_hour(Local::now().hour())
    )
}

/// Fixed sales handoff message sent when a conversation switches to Raquel
#[must_use]
pub fn sales_handoff() -> String {
    "Olá! 😊\n\n\
     Sou a Raquel, do setor comercial da SUNLUX Energia.\n\
     Vou entender sua necessidade e te ajudar com a melhor solução fotovoltaica."
        .to_string()
}

/// Time-of-day greeting
#[must_use]
pub const fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Bom dia!",
        12..=17 => "Boa tarde!",
        _ => "Boa noite!",
    }
}
