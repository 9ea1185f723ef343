use serde::{Deserialize, Serialize};

use crate::llm::ChatMessage;

const CONTEXT_PLACEHOLDER: &str = "{context}";
const QUESTION_PLACEHOLDER: &str = "{question}";

const HTML_ANALYSIS_TEMPLATE: &str = r#"Analise as respostas à pergunta abaixo em até 150 palavras, usando o contexto fornecido.

Contexto:
{context}

Pergunta:
{question}

Estruture a análise nas seguintes seções, e garanta que o HTML gerado esteja perfeito:
<h2 class="analise-titulo">Aspectos Positivos</h2>
<p class="analise-texto">Descreva os aspectos positivos ou pontos fortes destacados nas respostas.</p>
<h2 class="analise-titulo">Oportunidades de Melhoria</h2>
<p class="analise-texto">Identifique áreas para melhoria ou feedback construtivo com base nas respostas.</p>
<h2 class="analise-titulo">Impressões Gerais</h2>
<p class="analise-texto">Forneça suas impressões gerais e um resumo das respostas.</p>

Instruções:
- O único formato aceito para a análise é HTML; não deve haver texto fora das tags fornecidas.
- Cada seção deve ter um título na tag <h2> com a classe 'analise-titulo' e o conteúdo na tag <p> com a classe 'analise-texto'.
- Todas as tags HTML devem ser fechadas corretamente e sem erros de sintaxe.
- Forneça somente as seções solicitadas, sem qualquer introdução ou explicação adicional, como 'Aqui está a análise em formato HTML'."#;

const CONVERSATIONAL_TEMPLATE: &str = r#"Você é um assistente prestativo. Responda à pergunta em português, de forma conversacional e objetiva, usando apenas as informações do contexto abaixo. Se o contexto não contiver a resposta, diga isso claramente.

Contexto:
{context}

Pergunta:
{question}"#;

const SURVEY_JSON_TEMPLATE: &str = r#"Com base no contexto e na solicitação abaixo, gere 5 perguntas criativas para uma pesquisa do tipo satisfação.

Contexto:
{context}

Solicitação:
{question}

A pesquisa deve incluir perguntas dos seguintes tipos: "Texto Livre", "Escala de 1 a 10", "Múltipla Escolha" ou "Múltipla Seleção". As perguntas devem ser geradas como um array JSON puro, sem sintaxe Markdown, seguindo o modelo:

[
    {
        "tipoPerguntaEnum": "TEXTO_LIVRE",
        "perguntaString": "Texto da pergunta de Texto Livre",
        "posicao": 0,
        "ocultarRelatorio": false
    },
    {
        "tipoPerguntaEnum": "MULTIPLA_ESCOLHA",
        "perguntaString": "Texto da pergunta de Múltipla Escolha",
        "posicao": 1,
        "ocultarRelatorio": false,
        "opcoes": [
            {"opcaoString": "Opção 1", "posicao": 0, "peso": 1, "outros": false},
            {"opcaoString": "Outros...", "posicao": 1, "peso": 1, "outros": true}
        ]
    }
]

Instruções:
1. O campo numérico "posicao" sempre começa no 0.
2. O campo numérico "peso" sempre começa no 1.
3. O campo booleano "outros" é obrigatório e geralmente vale "false"; quando "outros=true", essa opção deve ser a última.
4. O campo "tipoPerguntaEnum" deve ser um dos seguintes: "TEXTO_LIVRE", "ESCALA_1_10", "MULTIPLA_SELECAO" ou "MULTIPLA_ESCOLHA".
5. O campo "ocultarRelatorio" é um booleano que deve sempre ser "false"."#;

/// Output-formatting variant for the assembled prompt.
///
/// The three variants differ only in the instructions sent to the model; the
/// retrieval pipeline is identical for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// Structured Portuguese analysis in fixed HTML sections.
    HtmlAnalysis,
    /// Conversational Portuguese answers grounded in the context.
    Conversational,
    /// Satisfaction-survey question generation as pure JSON.
    SurveyJson,
}

impl PromptStyle {
    fn template(&self) -> &'static str {
        match self {
            PromptStyle::HtmlAnalysis => HTML_ANALYSIS_TEMPLATE,
            PromptStyle::Conversational => CONVERSATIONAL_TEMPLATE,
            PromptStyle::SurveyJson => SURVEY_JSON_TEMPLATE,
        }
    }

    /// Substitutes the retrieved context and the user question into the
    /// variant template.
    pub fn render(&self, context: &str, question: &str) -> Vec<ChatMessage> {
        let content = self
            .template()
            .replace(CONTEXT_PLACEHOLDER, context)
            .replace(QUESTION_PLACEHOLDER, question);
        vec![ChatMessage::user(content)]
    }
}
