//! # Extração de Entidades Nomeadas
//!
//! A extração acontece em dois passos, sempre nesta ordem:
//!
//! 1. **classify**: escreve um rótulo BIO em cada token (`B-PER`, `I-ORG`, `O`).
//! 2. **chunk**: agrupa as sequências `B-X I-X*` em [`Entity`].
//!
//! ## Categorias de Entidades
//!
//! | Prefixo | Significado         | Exemplos                          |
//! |---------|---------------------|-----------------------------------|
//! | PER     | Pessoa              | Mary, Sherlock Holmes             |
//! | ORG     | Organização         | Google, Scotland Yard             |
//! | LOC     | Local/Geográfico    | London, Baker Street              |
//! | MISC    | Miscelânea          | World Cup, Frankenstein           |
//! | O       | Fora de entidade    | (qualquer palavra não-entidade)   |

use serde::{Deserialize, Serialize};

use crate::corpus;
use crate::error::StageResult;
use crate::rule_based::RuleEngine;
use crate::tokenizer::Token;

/// Categorias de entidade reconhecidas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    /// **Pessoa**: nomes de humanos reais ou fictícios.
    #[serde(rename = "PER")]
    Per,
    /// **Organização**: empresas, instituições, órgãos públicos.
    #[serde(rename = "ORG")]
    Org,
    /// **Localização**: países, cidades, ruas.
    #[serde(rename = "LOC")]
    Loc,
    /// **Miscelânea**: eventos, obras, o que não se encaixa nas anteriores.
    #[serde(rename = "MISC")]
    Misc,
}

impl EntityCategory {
    /// Nome da categoria como string
    pub fn name(&self) -> &'static str {
        match self {
            EntityCategory::Per => "PER",
            EntityCategory::Org => "ORG",
            EntityCategory::Loc => "LOC",
            EntityCategory::Misc => "MISC",
        }
    }

    /// Tenta parsear a partir de string (ex: "PER" → Some(Per))
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "PER" => Some(EntityCategory::Per),
            "ORG" => Some(EntityCategory::Org),
            "LOC" => Some(EntityCategory::Loc),
            "MISC" => Some(EntityCategory::Misc),
            _ => None,
        }
    }
}

/// Tag BIO aplicada a um token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BioTag {
    /// **Begin**: início de uma entidade. Ex: **Baker** (B-LOC) Street.
    Begin(EntityCategory),
    /// **Inside**: continuação de uma entidade. Ex: Baker **Street** (I-LOC).
    Inside(EntityCategory),
    /// **Outside**: o token não faz parte de nenhuma entidade.
    Outside,
}

impl BioTag {
    /// Representação textual da tag (ex: "B-PER", "I-ORG", "O")
    pub fn label(&self) -> String {
        match self {
            BioTag::Begin(cat) => format!("B-{}", cat.name()),
            BioTag::Inside(cat) => format!("I-{}", cat.name()),
            BioTag::Outside => "O".to_string(),
        }
    }

    /// Retorna a categoria desta tag (se for B- ou I-)
    pub fn category(&self) -> Option<EntityCategory> {
        match self {
            BioTag::Begin(c) | BioTag::Inside(c) => Some(*c),
            BioTag::Outside => None,
        }
    }

    /// `I-X` só pode seguir `B-X` ou `I-X` da mesma categoria
    pub fn is_valid_transition(prev: &BioTag, next: &BioTag) -> bool {
        match next {
            BioTag::Inside(cat) => match prev {
                BioTag::Begin(prev_cat) | BioTag::Inside(prev_cat) => prev_cat == cat,
                BioTag::Outside => false,
            },
            _ => true,
        }
    }

    /// Parseia uma tag a partir de string (ex: "B-PER" → Begin(Per))
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(BioTag::Outside);
        }
        let (prefix, name) = s.split_once('-')?;
        let cat = EntityCategory::from_name(name)?;
        match prefix {
            "B" => Some(BioTag::Begin(cat)),
            "I" => Some(BioTag::Inside(cat)),
            _ => None,
        }
    }
}

impl std::fmt::Display for BioTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Uma entidade identificada no texto (span de um ou mais tokens)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Texto da entidade (ex: "Baker Street")
    pub text: String,
    /// Categoria da entidade
    pub label: EntityCategory,
    /// Índice do primeiro token
    pub start_token: usize,
    /// Índice do último token (inclusivo)
    pub end_token: usize,
    /// Posição de byte inicial no texto original
    pub start: usize,
    /// Posição de byte final no texto original
    pub end: usize,
}

/// Colaborador do estágio de extração.
pub trait EntityExtracter: Send + Sync {
    /// Escreve o rótulo BIO de cada token, no lugar.
    fn classify(&self, tokens: &mut [Token]) -> StageResult<()>;

    /// Agrupa tokens já classificados em entidades.
    fn chunk(&self, tokens: &[Token]) -> StageResult<Vec<Entity>>;
}

/// Extrator padrão: motor de regras para classificar, máquina BIO para agrupar.
#[derive(Debug, Clone)]
pub struct RuleExtracter {
    engine: RuleEngine,
}

impl RuleExtracter {
    pub fn new(engine: RuleEngine) -> Self {
        Self { engine }
    }

    /// Extrator carregado com os gazetteers embutidos.
    pub fn with_builtin_gazetteers() -> Self {
        let mut engine = RuleEngine::new();
        for name in corpus::PERSONS {
            engine.add_person(name);
        }
        for name in corpus::LOCATIONS {
            engine.add_location(name);
        }
        for name in corpus::ORGANIZATIONS {
            engine.add_org(name);
        }
        for name in corpus::MISC {
            engine.add_misc(name);
        }
        for title in corpus::PERSON_TITLES {
            engine.add_person_title(title);
        }
        for suffix in corpus::ORG_SUFFIXES {
            engine.add_org_suffix(suffix);
        }
        Self::new(engine)
    }
}

impl Default for RuleExtracter {
    fn default() -> Self {
        Self::with_builtin_gazetteers()
    }
}

impl EntityExtracter for RuleExtracter {
    fn classify(&self, tokens: &mut [Token]) -> StageResult<()> {
        let tags = self.engine.apply(tokens);
        for (token, tag) in tokens.iter_mut().zip(tags) {
            token.label = tag.unwrap_or(BioTag::Outside).label();
        }
        Ok(())
    }

    fn chunk(&self, tokens: &[Token]) -> StageResult<Vec<Entity>> {
        Ok(chunk_bio(tokens))
    }
}

/// Converte tokens com rótulo BIO em entidades.
///
/// Máquina de estados do esquema BIO:
/// - Inicia uma nova entidade ao encontrar `B-XXX`.
/// - Continua a entidade enquanto encontrar `I-XXX` da **mesma** categoria.
/// - Finaliza ao encontrar `O`, `B-YYY` ou `I-YYY` de outra categoria.
///
/// Um `I-XXX` órfão é ignorado, assim como rótulos que não são BIO.
///
/// # Exemplo
/// `[B-PER, I-PER, O, B-LOC]` → `[Entity(PER), Entity(LOC)]`
pub fn chunk_bio(tokens: &[Token]) -> Vec<Entity> {
    let tags: Vec<Option<BioTag>> = tokens.iter().map(|t| BioTag::from_label(&t.label)).collect();
    let mut entities = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let Some(BioTag::Begin(cat)) = tags[i] else {
            i += 1;
            continue;
        };

        let mut text = tokens[i].text.clone();
        let mut j = i + 1;
        while j < tokens.len() {
            let (Some(prev), Some(next @ BioTag::Inside(_))) = (tags[j - 1], tags[j]) else {
                break;
            };
            if !BioTag::is_valid_transition(&prev, &next) {
                break;
            }
            // Tokens colados no texto original ("D.C.") não ganham espaço
            if tokens[j].start > tokens[j - 1].end {
                text.push(' ');
            }
            text.push_str(&tokens[j].text);
            j += 1;
        }

        entities.push(Entity {
            text,
            label: cat,
            start_token: i,
            end_token: j - 1,
            start: tokens[i].start,
            end: tokens[j - 1].end,
        });
        i = j;
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::{LexiconTagger, PosTagger};
    use crate::tokenizer::tokenize;

    fn labeled(text: &str, labels: &[&str]) -> Vec<Token> {
        let mut tokens = tokenize(text);
        for (token, label) in tokens.iter_mut().zip(labels) {
            token.label = label.to_string();
        }
        tokens
    }

    fn extract(text: &str) -> Vec<Entity> {
        let extracter = RuleExtracter::default();
        let mut tokens = tokenize(text);
        LexiconTagger::new().unwrap().tag(&mut tokens).unwrap();
        extracter.classify(&mut tokens).unwrap();
        extracter.chunk(&tokens).unwrap()
    }

    #[test]
    fn test_bio_labels() {
        assert_eq!(BioTag::Outside.label(), "O");
        assert_eq!(BioTag::Begin(EntityCategory::Per).label(), "B-PER");
        assert_eq!(BioTag::from_label("I-LOC"), Some(BioTag::Inside(EntityCategory::Loc)));
        assert_eq!(BioTag::from_label("X-LOC"), None);
        assert_eq!(BioTag::from_label(""), None);
    }

    #[test]
    fn test_valid_transitions() {
        let b_per = BioTag::Begin(EntityCategory::Per);
        let i_per = BioTag::Inside(EntityCategory::Per);
        assert!(BioTag::is_valid_transition(&b_per, &i_per));
        assert!(!BioTag::is_valid_transition(&BioTag::Outside, &i_per));
        assert!(!BioTag::is_valid_transition(&BioTag::Begin(EntityCategory::Org), &i_per));
    }

    #[test]
    fn test_chunk_bio_state_machine() {
        let tokens = labeled(
            "Sherlock Holmes lives in London",
            &["B-PER", "I-PER", "O", "O", "B-LOC"],
        );
        let entities = chunk_bio(&tokens);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].text, "Sherlock Holmes");
        assert_eq!((entities[0].start_token, entities[0].end_token), (0, 1));
        assert_eq!(entities[1].label, EntityCategory::Loc);
        assert_eq!(entities[1].start, 25);
    }

    #[test]
    fn test_chunk_ignores_orphan_inside() {
        let tokens = labeled("Paris Texas", &["I-LOC", "B-ORG"]);
        let entities = chunk_bio(&tokens);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].label, EntityCategory::Org);
    }

    #[test]
    fn test_chunk_stops_on_category_switch() {
        let tokens = labeled("Holmes London Bridge", &["B-PER", "I-LOC", "I-LOC"]);
        let entities = chunk_bio(&tokens);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Holmes");
        assert_eq!(entities[0].end_token, 0);
    }

    #[test]
    fn test_classify_labels_every_token() {
        let extracter = RuleExtracter::default();
        let mut tokens = tokenize("Mary had a little lamb");
        extracter.classify(&mut tokens).unwrap();
        assert!(tokens.iter().all(|t| !t.label.is_empty()));
        assert_eq!(tokens[0].label, "B-PER");
        assert_eq!(tokens[4].label, "O");
    }

    #[test]
    fn test_extract_builtin_gazetteers() {
        let entities = extract("Dr. Watson met Sherlock Holmes in London.");
        let found: Vec<(&str, EntityCategory)> =
            entities.iter().map(|e| (e.text.as_str(), e.label)).collect();
        assert_eq!(
            found,
            [
                ("Watson", EntityCategory::Per),
                ("Sherlock Holmes", EntityCategory::Per),
                ("London", EntityCategory::Loc),
            ]
        );
    }

    #[test]
    fn test_extract_multiword_location() {
        let entities = extract("They shared rooms at Baker Street.");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Baker Street");
        assert_eq!(entities[0].label, EntityCategory::Loc);
    }
}
